use gradnet::{Activation, LossType, Matrix, Network, Sgd, TrainConfig, train_loop};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> gradnet::Result<()> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(42);
    let mut network = Network::new(
        vec![
            (2, 4, Activation::Sigmoid),
            (4, 1, Activation::Sigmoid),
        ],
        &mut rng,
    )?;

    let inputs = Matrix::from_data(vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ]);
    let targets = Matrix::from_data(vec![
        vec![0.0],
        vec![1.0],
        vec![1.0],
        vec![0.0],
    ]);

    let optimizer = Sgd::new(2.0);
    let mut config = TrainConfig::new(20_000, LossType::Mse);
    config.report_every = 1000;

    let final_loss = train_loop(&mut network, &inputs, &targets, None, &optimizer, &config)?;
    println!("final loss: {final_loss:.6}");

    let outputs = network.forward(&inputs)?;
    for (input, output) in inputs.data.iter().zip(outputs.data.iter()) {
        println!("Input: {input:?} -> Output: {:.4}", output[0]);
    }

    Ok(())
}
