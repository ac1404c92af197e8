use std::{env, process};

use anyhow::Context;
use log::info;

use perceptron::{
    classifier,
    cli::{self, ClassArgs, Command, TrainArgs},
    persist, visualize, Trainer,
};

fn main() {
    env_logger::init();

    let command = match cli::parse(env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("perceptron: {e}");
            eprintln!("{}", e.usage());
            process::exit(1);
        }
    };

    let ret = match command {
        Command::Train(args) => train(args),
        Command::Class(args) => class(args),
        Command::Help(usage) => {
            println!("{usage}");
            return;
        }
    };

    if let Err(e) = ret {
        eprintln!("perceptron: {e:#}");
        process::exit(1);
    }
}

fn train(args: TrainArgs) -> anyhow::Result<()> {
    let trainer = Trainer::new(args.config()?);
    let report = trainer
        .train(&args.training_set)
        .with_context(|| format!("training on {}", args.training_set.display()))?;

    println!(
        "perceptron: Error rate on trainingset: {}",
        report.error_rate()
    );
    info!("trained in {} cycle(s)", report.cycles());

    let model = report.into_model();
    persist::save(&model, &args.model)?;

    if args.visualize {
        let path = visualize::visualization_path(&args.model);
        visualize::to_image(&model, &path)
            .with_context(|| format!("visualizing model as {}", path.display()))?;
    }

    Ok(())
}

fn class(args: ClassArgs) -> anyhow::Result<()> {
    let model = persist::load(&args.model)
        .with_context(|| format!("loading model {}", args.model.display()))?;

    let labels = classifier::classify_many(&args.images, &model)?;

    if let [label] = labels.as_slice() {
        println!("{label}");
        return Ok(());
    }

    for (image, label) in args.images.iter().zip(labels) {
        println!("{}: {label}", image.display());
    }

    Ok(())
}
