//! Seed, train and load: the steps that touch the filesystem.

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use jusdata_ai::{
    ArtifactManifest, OutcomeModel, RiskEngine, SimilarityIndex, TrainConfig, TrainedArtifacts,
    train,
};
use jusdata_core::{CaseRecord, synthetic_corpus};
use jusdata_store::artifacts::{
    CORPUS_FILE, MANIFEST_FILE, OUTCOME_MODEL_FILE, SIMILARITY_INDEX_FILE,
};
use jusdata_store::{ArtifactDir, read_corpus, write_corpus};
use tracing::info;

pub struct TrainStats {
    pub manifest: ArtifactManifest,
    pub elapsed_secs: f64,
}

/// Write the synthetic corpus, `repeats` copies of every combination.
pub fn run_seed(out: &Path, repeats: usize) -> anyhow::Result<usize> {
    let corpus = synthetic_corpus(repeats);
    write_corpus(out, &corpus)
        .with_context(|| format!("writing synthetic corpus to {}", out.display()))?;
    Ok(corpus.len())
}

/// Read a corpus file, train both models and persist the artifact set.
pub fn run_train(
    corpus_path: &Path,
    models: &ArtifactDir,
    config: &TrainConfig,
) -> anyhow::Result<TrainStats> {
    let start = Instant::now();

    let corpus = read_corpus(corpus_path)
        .with_context(|| format!("reading corpus {}", corpus_path.display()))?;
    eprintln!("  Read {} rows from {}", corpus.len(), corpus_path.display());

    let artifacts = train(corpus, config).context("training models")?;
    eprintln!(
        "  Trained on {} rows ({} iterations{})",
        artifacts.manifest.corpus_rows,
        artifacts.manifest.fit.iterations,
        if artifacts.manifest.fit.converged { "" } else { ", not converged" }
    );

    save_artifacts(models, &artifacts)?;
    eprintln!("  Wrote artifacts to {}", models.root().display());

    Ok(TrainStats {
        manifest: artifacts.manifest,
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}

pub fn save_artifacts(models: &ArtifactDir, artifacts: &TrainedArtifacts) -> anyhow::Result<()> {
    models
        .write(MANIFEST_FILE, &artifacts.manifest)
        .context("writing manifest")?;
    models
        .write(OUTCOME_MODEL_FILE, &artifacts.outcome_model)
        .context("writing outcome model")?;
    models
        .write(SIMILARITY_INDEX_FILE, &artifacts.similarity_index)
        .context("writing similarity index")?;
    models
        .write(CORPUS_FILE, &artifacts.corpus)
        .context("writing corpus snapshot")?;
    Ok(())
}

pub fn load_manifest(models: &ArtifactDir) -> anyhow::Result<ArtifactManifest> {
    models
        .read(MANIFEST_FILE)
        .with_context(|| format!("loading manifest from {}", models.root().display()))
}

/// Load every artifact and validate them together into an engine.
pub fn load_engine(models: &ArtifactDir) -> anyhow::Result<RiskEngine> {
    models
        .ensure_complete()
        .with_context(|| format!("incomplete models directory {}", models.root().display()))?;
    let artifacts = TrainedArtifacts {
        manifest: load_manifest(models)?,
        outcome_model: models
            .read::<OutcomeModel>(OUTCOME_MODEL_FILE)
            .context("loading outcome model")?,
        similarity_index: models
            .read::<SimilarityIndex>(SIMILARITY_INDEX_FILE)
            .context("loading similarity index")?,
        corpus: models
            .read::<Vec<CaseRecord>>(CORPUS_FILE)
            .context("loading corpus snapshot")?,
    };
    let engine = RiskEngine::from_artifacts(artifacts).context("validating artifacts")?;
    info!(models = %models.root().display(), "loaded artifacts");
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jusdata_ai::RiskQuery;
    use jusdata_core::synthetic::COMBINATIONS;
    use tempfile::TempDir;

    #[test]
    fn seed_train_load_analyze() {
        let tmp = TempDir::new().unwrap();
        let corpus = tmp.path().join("data").join("corpus.csv");
        assert_eq!(run_seed(&corpus, 10).unwrap(), 160);

        let models = ArtifactDir::new(tmp.path().join("models"));
        let stats = run_train(&corpus, &models, &TrainConfig::default()).unwrap();
        assert_eq!(stats.manifest.corpus_rows, 160);

        let engine = load_engine(&models).unwrap();
        let (forum, claim, _, _) = COMBINATIONS[0];
        let report = engine.analyze(&RiskQuery::new(claim, forum)).unwrap();
        assert_eq!(report.similar_cases.len(), 5);
        assert_eq!(load_manifest(&models).unwrap(), stats.manifest);
    }

    #[test]
    fn loading_an_empty_dir_fails_with_hint() {
        let tmp = TempDir::new().unwrap();
        let err = load_engine(&ArtifactDir::new(tmp.path())).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains(MANIFEST_FILE), "{message}");
        assert!(message.contains("jusdata train"), "{message}");
    }

    #[test]
    fn training_a_missing_corpus_fails() {
        let tmp = TempDir::new().unwrap();
        let models = ArtifactDir::new(tmp.path().join("models"));
        let err = run_train(&tmp.path().join("nope.csv"), &models, &TrainConfig::default());
        assert!(err.is_err());
        assert!(!models.root().exists());
    }
}
