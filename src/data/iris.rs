use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Class labels recognized by the Iris loader, in one-hot order.
pub const IRIS_CLASSES: [&str; 3] = ["Iris-setosa", "Iris-versicolor", "Iris-virginica"];

const N_FEATURES: usize = 4;

/// A dataset split into training and validation matrices.
///
/// Inputs are `(rows, 4)`; labels are `(rows, 3)` one-hot rows, each summing
/// to exactly 1.
#[derive(Debug, Clone)]
pub struct DataSplit {
    pub train_inputs: Matrix,
    pub train_labels: Matrix,
    pub val_inputs: Matrix,
    pub val_labels: Matrix,
}

/// Loads the Iris CSV at `path`, optionally shuffling rows with the caller's
/// generator, and splits it `split_percentage` / `1 - split_percentage` into
/// training and validation sets (0.8 is the conventional choice).
///
/// Two row schemas are recognized:
/// - `sepal_len,sepal_wid,petal_len,petal_wid,label`
/// - `index,sepal_len,sepal_wid,petal_len,petal_wid,label`
///
/// Any unreadable path surfaces as an I/O error; any malformed row or
/// unrecognized label aborts the whole load with a data-parse error — no
/// partial dataset is ever returned.
pub fn load_iris<P: AsRef<Path>, R: Rng>(
    path: P,
    shuffle: bool,
    split_percentage: f64,
    rng: &mut R,
) -> Result<DataSplit> {
    if !(0.0..=1.0).contains(&split_percentage) {
        return Err(Error::Config(format!(
            "split percentage {split_percentage} is not within [0, 1]"
        )));
    }

    let text = std::fs::read_to_string(path)?;

    let mut rows: Vec<(Vec<f64>, Vec<f64>)> = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        rows.push(parse_row(line, line_no + 1)?);
    }

    if rows.is_empty() {
        return Err(Error::DataParse("dataset contains no rows".into()));
    }

    if shuffle {
        rows.shuffle(rng);
    }

    let split_at = (rows.len() as f64 * split_percentage) as usize;
    let (train, val) = rows.split_at(split_at);

    Ok(DataSplit {
        train_inputs: Matrix::from_data(train.iter().map(|(x, _)| x.clone()).collect()),
        train_labels: Matrix::from_data(train.iter().map(|(_, y)| y.clone()).collect()),
        val_inputs: Matrix::from_data(val.iter().map(|(x, _)| x.clone()).collect()),
        val_labels: Matrix::from_data(val.iter().map(|(_, y)| y.clone()).collect()),
    })
}

/// Parses one CSV row into (features, one-hot label).
fn parse_row(line: &str, line_no: usize) -> Result<(Vec<f64>, Vec<f64>)> {
    let cells: Vec<&str> = line.split(',').map(str::trim).collect();

    // Raw schema: 4 features + label. Indexed schema: leading row index.
    let feature_cells: &[&str] = match cells.len() {
        n if n == N_FEATURES + 1 => &cells[..N_FEATURES],
        n if n == N_FEATURES + 2 => &cells[1..N_FEATURES + 1],
        n => {
            return Err(Error::DataParse(format!(
                "row {line_no}: expected {} or {} columns, got {n}",
                N_FEATURES + 1,
                N_FEATURES + 2,
            )));
        }
    };

    let mut features = Vec::with_capacity(N_FEATURES);
    for cell in feature_cells {
        let value: f64 = cell.parse().map_err(|_| {
            Error::DataParse(format!("row {line_no}: '{cell}' is not a number"))
        })?;
        features.push(value);
    }

    let label = cells.last().unwrap_or(&"");
    let class_idx = IRIS_CLASSES
        .iter()
        .position(|name| name == label)
        .ok_or_else(|| {
            Error::DataParse(format!("row {line_no}: unknown class label '{label}'"))
        })?;

    let mut one_hot = vec![0.0; IRIS_CLASSES.len()];
    one_hot[class_idx] = 1.0;

    Ok((features, one_hot))
}
