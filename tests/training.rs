//! End-to-end properties of the forward/backward/update pipeline:
//! analytic gradients against central finite differences, and loss descent
//! over full training steps.

use gradnet::{
    Activation, LossType, Matrix, Network, Sgd, TrainConfig,
    train_loop, train_step,
};
use gradnet::train::trainer::evaluate_loss;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

const FD_EPS: f64 = 1e-6;
const REL_TOL: f64 = 1e-3;

/// Scalar loss of a network snapshot on a fixed batch.
fn loss_at(network: &Network, inputs: &Matrix, targets: &Matrix, loss: LossType) -> f64 {
    let mut net = network.clone();
    let output = net.forward(inputs).unwrap();
    loss.loss(&output, targets).unwrap()
}

fn relative_error(a: f64, b: f64) -> f64 {
    (a - b).abs() / f64::max(1e-8, a.abs() + b.abs())
}

/// Checks every weight and bias gradient of `network` against central finite
/// differences of the scalar loss.
fn assert_gradients_match(
    network: &mut Network,
    inputs: &Matrix,
    targets: &Matrix,
    loss: LossType,
) {
    let output = network.forward(inputs).unwrap();
    let delta = loss.derivative(&output, targets).unwrap();
    let grads = network.backward(delta).unwrap();

    for (l, layer_grads) in grads.iter().enumerate() {
        for i in 0..layer_grads.weights.rows {
            for j in 0..layer_grads.weights.cols {
                let mut plus = network.clone();
                plus.layers[l].weights.data[i][j] += FD_EPS;
                let mut minus = network.clone();
                minus.layers[l].weights.data[i][j] -= FD_EPS;

                let numeric = (loss_at(&plus, inputs, targets, loss)
                    - loss_at(&minus, inputs, targets, loss))
                    / (2.0 * FD_EPS);
                let analytic = layer_grads.weights.data[i][j];

                assert!(
                    relative_error(analytic, numeric) < REL_TOL,
                    "layer {l} weight ({i},{j}): analytic {analytic} vs numeric {numeric}"
                );
            }
        }

        for j in 0..layer_grads.biases.cols {
            let mut plus = network.clone();
            plus.layers[l].biases.data[0][j] += FD_EPS;
            let mut minus = network.clone();
            minus.layers[l].biases.data[0][j] -= FD_EPS;

            let numeric = (loss_at(&plus, inputs, targets, loss)
                - loss_at(&minus, inputs, targets, loss))
                / (2.0 * FD_EPS);
            let analytic = layer_grads.biases.data[0][j];

            assert!(
                relative_error(analytic, numeric) < REL_TOL,
                "layer {l} bias {j}: analytic {analytic} vs numeric {numeric}"
            );
        }
    }
}

fn one_hot_targets(rng: &mut StdRng, rows: usize, classes: usize) -> Matrix {
    let data = (0..rows)
        .map(|_| {
            let mut row = vec![0.0; classes];
            row[rng.gen_range(0..classes)] = 1.0;
            row
        })
        .collect();
    Matrix::from_data(data)
}

#[test]
fn gradient_check_sigmoid_mse() {
    let mut rng = StdRng::seed_from_u64(100);
    let mut net = Network::new(
        vec![
            (3, 5, Activation::Sigmoid),
            (5, 2, Activation::Sigmoid),
        ],
        &mut rng,
    )
    .unwrap();

    let inputs = Matrix::random(4, 3, &mut rng);
    let targets = Matrix::random(4, 2, &mut rng).map(|x| (x + 1.0) / 2.0);

    assert_gradients_match(&mut net, &inputs, &targets, LossType::Mse);
}

#[test]
fn gradient_check_fused_softmax_cross_entropy() {
    let mut rng = StdRng::seed_from_u64(200);
    let mut net = Network::new(
        vec![
            (3, 4, Activation::Sigmoid),
            (4, 3, Activation::Softmax),
        ],
        &mut rng,
    )
    .unwrap();

    let inputs = Matrix::random(5, 3, &mut rng);
    let targets = one_hot_targets(&mut rng, 5, 3);

    assert_gradients_match(&mut net, &inputs, &targets, LossType::CrossEntropy);
}

#[test]
fn gradient_check_softmax_dense_jacobian_path() {
    // MSE over a softmax output exercises the full diag(y) - y⊗y Jacobian
    // contraction instead of the fused cross-entropy shortcut.
    let mut rng = StdRng::seed_from_u64(300);
    let mut net = Network::new(vec![(3, 3, Activation::Softmax)], &mut rng).unwrap();

    let inputs = Matrix::random(4, 3, &mut rng);
    let targets = one_hot_targets(&mut rng, 4, 3);

    assert_gradients_match(&mut net, &inputs, &targets, LossType::Mse);
}

#[test]
fn gradient_check_binary_cross_entropy() {
    let mut rng = StdRng::seed_from_u64(400);
    let mut net = Network::new(
        vec![
            (2, 4, Activation::Sigmoid),
            (4, 1, Activation::Sigmoid),
        ],
        &mut rng,
    )
    .unwrap();

    let inputs = Matrix::random(6, 2, &mut rng);
    let targets = Matrix::from_data(
        (0..6).map(|i| vec![if i % 2 == 0 { 1.0 } else { 0.0 }]).collect(),
    );

    assert_gradients_match(&mut net, &inputs, &targets, LossType::BinaryCrossEntropy);
}

#[test]
fn one_training_step_strictly_decreases_the_loss() {
    let mut rng = StdRng::seed_from_u64(500);
    let mut net = Network::new(
        vec![
            (4, 8, Activation::Sigmoid),
            (8, 3, Activation::Softmax),
        ],
        &mut rng,
    )
    .unwrap();

    let inputs = Matrix::random(20, 4, &mut rng);
    let targets = one_hot_targets(&mut rng, 20, 3);
    let optimizer = Sgd::new(0.5);

    let before = evaluate_loss(&mut net, &inputs, &targets, LossType::CrossEntropy).unwrap();
    train_step(&mut net, &inputs, &targets, LossType::CrossEntropy, &optimizer).unwrap();
    let after = evaluate_loss(&mut net, &inputs, &targets, LossType::CrossEntropy).unwrap();

    assert!(after < before, "loss did not decrease: {before} -> {after}");
}

#[test]
fn training_loop_reduces_loss_over_epochs() {
    let mut rng = StdRng::seed_from_u64(600);
    let mut net = Network::new(
        vec![
            (2, 6, Activation::Sigmoid),
            (6, 1, Activation::Sigmoid),
        ],
        &mut rng,
    )
    .unwrap();

    // Linearly separable toy problem: label is 1 when x0 + x1 > 0.
    let inputs = Matrix::random(40, 2, &mut rng);
    let targets = Matrix::from_data(
        inputs.data.iter()
            .map(|row| vec![if row[0] + row[1] > 0.0 { 1.0 } else { 0.0 }])
            .collect(),
    );

    let optimizer = Sgd::new(1.0);
    let mut config = TrainConfig::new(200, LossType::Mse);
    config.report_every = 0;

    let initial = evaluate_loss(&mut net, &inputs, &targets, LossType::Mse).unwrap();
    let final_loss =
        train_loop(&mut net, &inputs, &targets, None, &optimizer, &config).unwrap();

    assert!(
        final_loss < initial / 2.0,
        "expected substantial descent, got {initial} -> {final_loss}"
    );
}

#[test]
fn learning_rate_effect_is_batch_size_invariant() {
    // Duplicating every training row must not change the parameter update,
    // because gradient reductions over the batch are averages, not sums.
    let mut rng = StdRng::seed_from_u64(700);
    let net = Network::new(
        vec![
            (3, 4, Activation::Sigmoid),
            (4, 3, Activation::Softmax),
        ],
        &mut rng,
    )
    .unwrap();

    let inputs = Matrix::random(5, 3, &mut rng);
    let targets = one_hot_targets(&mut rng, 5, 3);

    let doubled_inputs = Matrix::from_data(
        inputs.data.iter().chain(inputs.data.iter()).cloned().collect(),
    );
    let doubled_targets = Matrix::from_data(
        targets.data.iter().chain(targets.data.iter()).cloned().collect(),
    );

    let optimizer = Sgd::new(0.3);

    let mut net_single = net.clone();
    train_step(&mut net_single, &inputs, &targets, LossType::CrossEntropy, &optimizer).unwrap();

    let mut net_double = net.clone();
    train_step(
        &mut net_double,
        &doubled_inputs,
        &doubled_targets,
        LossType::CrossEntropy,
        &optimizer,
    )
    .unwrap();

    for (a, b) in net_single.layers.iter().zip(net_double.layers.iter()) {
        for (row_a, row_b) in a.weights.data.iter().zip(b.weights.data.iter()) {
            for (x, y) in row_a.iter().zip(row_b.iter()) {
                assert!((x - y).abs() < 1e-12);
            }
        }
    }
}
