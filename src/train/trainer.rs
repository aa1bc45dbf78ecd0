use log::info;

use crate::activation::activation::Activation;
use crate::error::{Error, Result};
use crate::loss::loss_type::LossType;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// One full training step: forward, loss, backward, update — in that strict
/// order. Returns the loss measured before the update.
pub fn train_step(
    network: &mut Network,
    inputs: &Matrix,
    targets: &Matrix,
    loss_type: LossType,
    optimizer: &Sgd,
) -> Result<f64> {
    let output = network.forward(inputs)?;
    let loss = loss_type.loss(&output, targets)?;

    let delta = loss_type.derivative(&output, targets)?;
    let grads = network.backward(delta)?;

    for (layer, layer_grads) in network.layers.iter_mut().zip(grads.iter()) {
        optimizer.step(layer, layer_grads);
    }

    Ok(loss)
}

/// Trains `network` for `config.epochs` full-batch steps and returns the
/// training loss of the last completed epoch.
///
/// Progress is reported through the `log` facade every
/// `config.report_every` epochs (and for the final epoch): training and
/// validation loss, plus argmax accuracy for cross-entropy runs.
pub fn train_loop(
    network: &mut Network,
    train_inputs: &Matrix,
    train_targets: &Matrix,
    validation: Option<(&Matrix, &Matrix)>,
    optimizer: &Sgd,
    config: &TrainConfig,
) -> Result<f64> {
    if train_inputs.rows == 0 {
        return Err(Error::Config("training set is empty".into()));
    }
    if train_inputs.rows != train_targets.rows {
        return Err(Error::shape(
            "train_loop",
            format!("{} target rows", train_inputs.rows),
            format!("{}", train_targets.rows),
        ));
    }
    validate_loss_pairing(network, config.loss_type)?;

    let mut last_loss = 0.0;

    for epoch in 1..=config.epochs {
        last_loss = train_step(
            network,
            train_inputs,
            train_targets,
            config.loss_type,
            optimizer,
        )?;

        let report = config.report_every != 0
            && (epoch % config.report_every == 0 || epoch == config.epochs);
        if !report {
            continue;
        }

        let classification = config.loss_type == LossType::CrossEntropy;

        let (val_loss, val_accuracy) = match validation {
            Some((vx, vy)) => {
                let vl = evaluate_loss(network, vx, vy, config.loss_type)?;
                let va = if classification {
                    Some(accuracy(network, vx, vy)?)
                } else {
                    None
                };
                (Some(vl), va)
            }
            None => (None, None),
        };

        let train_accuracy = if classification {
            Some(accuracy(network, train_inputs, train_targets)?)
        } else {
            None
        };

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss: last_loss,
            val_loss,
            train_accuracy,
            val_accuracy,
        };
        info!("{stats}");
    }

    Ok(last_loss)
}

/// Mean loss over a dataset without updating parameters.
pub fn evaluate_loss(
    network: &mut Network,
    inputs: &Matrix,
    targets: &Matrix,
    loss_type: LossType,
) -> Result<f64> {
    let output = network.forward(inputs)?;
    loss_type.loss(&output, targets)
}

/// Fraction of rows whose argmax prediction matches the argmax target.
pub fn accuracy(network: &mut Network, inputs: &Matrix, targets: &Matrix) -> Result<f64> {
    if inputs.rows == 0 {
        return Ok(0.0);
    }
    let output = network.forward(inputs)?;
    let correct = output.data.iter().zip(targets.data.iter())
        .filter(|(predicted, expected)| argmax(predicted) == argmax(expected))
        .count();
    Ok(correct as f64 / inputs.rows as f64)
}

/// The categorical cross-entropy gradient is taken w.r.t. pre-softmax
/// logits; it is only meaningful when the output layer is Softmax.
fn validate_loss_pairing(network: &Network, loss_type: LossType) -> Result<()> {
    if loss_type == LossType::CrossEntropy
        && network.output_activation() != Some(Activation::Softmax)
    {
        return Err(Error::Config(
            "categorical cross-entropy requires a Softmax output layer".into(),
        ));
    }
    Ok(())
}

/// Index of the maximum element in a slice.
fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
