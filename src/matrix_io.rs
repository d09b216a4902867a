//! Text format for matrices.
//!
//! ```text
//! <rows> <cols>
//! a00 a01 ... a0(cols-1)
//! ...
//! ```
//!
//! The reader is token based: line breaks carry no meaning beyond separating
//! tokens. Values are parsed with single precision and widened to `f64`, so
//! reading back a written matrix yields the `f32`-rounded originals.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::{Error, Matrix};

/// Read a matrix, reporting why it failed.
pub fn try_read<P: AsRef<Path>>(path: P) -> Result<Matrix, Error> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut text = String::new();
    file.read_to_string(&mut text)?;
    let matrix = parse(&text)?;
    debug!(?path, rows = matrix.rows(), cols = matrix.cols(), "matrix loaded");
    Ok(matrix)
}

/// Read a matrix, returning the invalid matrix and `false` on any failure.
pub fn read<P: AsRef<Path>>(path: P) -> (Matrix, bool) {
    match try_read(path) {
        Ok(matrix) => (matrix, true),
        Err(e) => {
            debug!("matrix read failed: {}", e);
            (Matrix::invalid(), false)
        }
    }
}

/// Parse the text format from memory.
pub fn parse(text: &str) -> Result<Matrix, Error> {
    let mut tokens = text.split_whitespace();
    let (rows, cols) = match (tokens.next(), tokens.next()) {
        (Some(r), Some(c)) => (parse_dimension(r, c)?, parse_dimension(c, r)?),
        (r, c) => {
            return Err(Error::Header(
                [r, c].iter().flatten().copied().collect::<Vec<_>>().join(" "),
            ))
        }
    };

    let mut matrix = Matrix::create(rows, cols);
    if !matrix.is_valid() {
        return Err(Error::InvalidMatrix("cannot allocate matrix storage"));
    }

    let expected = rows * cols;
    for (found, slot) in matrix.data_mut().iter_mut().enumerate() {
        let value = tokens
            .next()
            .and_then(|t| t.parse::<f32>().ok())
            .ok_or(Error::Truncated { expected, found })?;
        *slot = f64::from(value);
    }
    Ok(matrix)
}

fn parse_dimension(token: &str, other: &str) -> Result<usize, Error> {
    match token.parse::<usize>() {
        Ok(d) if d > 0 => Ok(d),
        _ => Err(Error::Header(format!("{} {}", token, other))),
    }
}

/// Save a matrix in the text format.
pub fn write<P: AsRef<Path>>(path: P, matrix: &Matrix) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_to(&mut writer, matrix)?;
    writer.flush()?;
    Ok(())
}

pub fn write_to<W: Write>(out: &mut W, matrix: &Matrix) -> Result<(), Error> {
    if !matrix.is_valid() {
        return Err(Error::InvalidMatrix("cannot write an invalid matrix"));
    }
    writeln!(out, "{} {}", matrix.rows(), matrix.cols())?;
    for i in 0..matrix.rows() {
        let row = matrix.row(i)?;
        for (j, value) in row.iter().enumerate() {
            if j > 0 {
                write!(out, " ")?;
            }
            write!(out, "{}", value)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Print `name:` followed by the matrix as a fixed-width table.
///
/// An invalid matrix prints only the name line.
pub fn print_matrix<W: Write>(out: &mut W, name: &str, matrix: &Matrix) -> std::io::Result<()> {
    writeln!(out, "{}:", name)?;
    write_table(out, matrix)
}

/// Rows of `%7.3f ` cells, one line per row.
pub fn write_table<W: Write>(out: &mut W, matrix: &Matrix) -> std::io::Result<()> {
    if !matrix.is_valid() {
        return Ok(());
    }
    for row in matrix.data().chunks(matrix.cols()) {
        for value in row {
            write!(out, "{:7.3} ", value)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
