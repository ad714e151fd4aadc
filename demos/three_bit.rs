//! Train one network on a three-input problem and print its predictions

use relict::{Network, SampleSet};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let samples = SampleSet::new()
        .add(vec![0.0, 0.0, 0.0], vec![0.0])
        .add(vec![1.0, 0.0, 0.0], vec![1.0])
        .add(vec![0.0, 1.0, 0.0], vec![0.0])
        .add(vec![0.0, 0.0, 1.0], vec![1.0])
        .build();

    let net = match Network::new(2, 30, samples) {
        Ok(net) => net,
        Err(e) => {
            eprintln!("cannot build network: {}", e);
            return;
        }
    };

    let mut trained = net.train(100, 0.000001);

    let samples = trained.samples().clone();
    for sample in samples.iter() {
        println!(
            "inputs: {:?} | result: {:?}",
            sample.inputs,
            trained.predict(&sample.inputs)
        );
    }
}
