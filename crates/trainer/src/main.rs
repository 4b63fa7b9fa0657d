use anyhow::Result;
use std::fs;
use std::path::Path;
use tch::Device;

use graph_core::{EncoderConfig, GraphRnnConfig, MolGraph};
use trainer::{BfsGraphDataset, TrainerConfig};

fn main() -> Result<()> {
    env_logger::init();

    let corpus_path = "data/corpus.json";
    let maps_path = "data/label_maps.json";

    // 1. Load Configs from configs/
    let encoder_config_path = "configs/encoder_config.yaml";
    let training_config_path = "configs/training_config.yaml";

    let encoder_config: EncoderConfig = if Path::new(encoder_config_path).exists() {
        let content = fs::read_to_string(encoder_config_path)?;
        serde_yaml::from_str(&content)?
    } else {
        EncoderConfig::default()
    };

    let trainer_config: TrainerConfig = if Path::new(training_config_path).exists() {
        let content = fs::read_to_string(training_config_path)?;
        serde_yaml::from_str(&content)?
    } else {
        TrainerConfig::default()
    };

    let device = Device::cuda_if_available();
    log::info!("Using device: {:?}", device);

    // 2. Load the corpus and run the one-time preprocessing pass
    let content = fs::read_to_string(corpus_path)?;
    let graphs: Vec<MolGraph> = serde_json::from_str(&content)?;
    log::info!("Loaded {} graphs from {}", graphs.len(), corpus_path);

    let mut dataset = BfsGraphDataset::new(graphs, &encoder_config, device)?;
    dataset.encoder().maps().save(maps_path)?;
    log::info!(
        "num_node_classes={} num_edge_classes={} max_num_nodes={} start_node_class={}",
        dataset.num_node_classes(),
        dataset.num_edge_classes(),
        dataset.max_num_nodes(),
        dataset.encoder().start_node_class()
    );
    log::info!("Saved label maps to {}", maps_path);

    // 3. Report the derived model sizing the generator will be built with
    let model_config = GraphRnnConfig::default();
    log::info!(
        "node_rnn_input_size={} edge_rnn_output_size={}",
        model_config.node_rnn_input_size(
            dataset.num_node_classes(),
            dataset.num_edge_classes(),
            encoder_config.max_prev_nodes
        ),
        model_config.edge_rnn_output_size(dataset.num_edge_classes())
    );

    // 4. Smoke-sample one batch so mis-sized corpora fail before training
    let (nodes, edges, lengths) = dataset.sample_batch(trainer_config.batch_size)?;
    log::info!(
        "sampled batch: nodes {:?}, edge windows {:?}, lengths {:?}",
        nodes.size(),
        edges.size(),
        lengths.size()
    );

    Ok(())
}
