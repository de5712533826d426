//! Off-thread seed generation
//!
//! Mnemonic and seed derivation (PBKDF2 inside BIP-39) is CPU heavy, so it runs
//! on a dedicated worker thread. Callers talk to the worker with one request
//! and one reply per job and simply await the reply.

use crate::keys::{Mnemonic, Seed, ENTROPY_LEN};
use crate::{Error, Result};
use async_trait::async_trait;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use tokio::sync::{mpsc, oneshot};
use zeroize::Zeroizing;

/// Wrapper text the worker boundary adds around failure messages
const WRAPPER_PREFIXES: &[&str] = &["Uncaught Error: ", "Error: ", "panicked at: ", "panicked: "];

/// What to derive a seed from
pub enum GenerationRequest {
    /// Fresh wallet from caller-supplied entropy
    Entropy(Zeroizing<[u8; ENTROPY_LEN]>),
    /// Recovery from an existing passphrase (mnemonic phrase)
    Passphrase(Zeroizing<String>),
}

impl GenerationRequest {
    /// Recovery request from a passphrase
    pub fn passphrase(phrase: &str) -> Self {
        GenerationRequest::Passphrase(Zeroizing::new(phrase.to_string()))
    }

    /// Progress message shown while the request runs
    pub fn progress_message(&self) -> &'static str {
        match self {
            GenerationRequest::Entropy(_) => "Generating",
            GenerationRequest::Passphrase(_) => "Decoding seed phrase",
        }
    }
}

/// Worker output
#[derive(Debug, Clone)]
pub struct GeneratedSeed {
    /// Derived seed
    pub seed: Seed,
    /// Mnemonic encoding of the seed
    pub mnemonic: Mnemonic,
}

/// Asynchronous seed derivation capability
#[async_trait]
pub trait SeedGenerator: Send + Sync {
    /// Derive a seed and mnemonic; failures surface as [`Error::Generation`]
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedSeed>;
}

struct Job {
    request: GenerationRequest,
    reply: oneshot::Sender<Result<GeneratedSeed>>,
}

/// BIP-39 generator running on its own thread
pub struct GenerationWorker {
    jobs: mpsc::UnboundedSender<Job>,
}

impl GenerationWorker {
    /// Start the worker thread
    pub fn spawn() -> Result<Self> {
        let (jobs, queue) = mpsc::unbounded_channel();
        thread::Builder::new()
            .name("seed-generator".to_string())
            .spawn(move || worker_loop(queue))
            .map_err(|e| Error::Generation(format!("Failed to start worker: {}", e)))?;
        Ok(Self { jobs })
    }
}

#[async_trait]
impl SeedGenerator for GenerationWorker {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedSeed> {
        let (reply, response) = oneshot::channel();
        self.jobs
            .send(Job { request, reply })
            .map_err(|_| Error::Generation("generation worker is not running".to_string()))?;

        response
            .await
            .map_err(|_| Error::Generation("generation worker dropped the request".to_string()))?
    }
}

fn worker_loop(mut queue: mpsc::UnboundedReceiver<Job>) {
    tracing::debug!("Seed generation worker started");
    while let Some(job) = queue.blocking_recv() {
        let result = panic::catch_unwind(AssertUnwindSafe(|| derive(&job.request)))
            .unwrap_or_else(|payload| {
                Err(Error::Generation(sanitize_message(&panic_text(payload))))
            });
        if job.reply.send(result).is_err() {
            tracing::debug!("Generation result discarded; caller went away");
        }
    }
    tracing::debug!("Seed generation worker stopped");
}

fn derive(request: &GenerationRequest) -> Result<GeneratedSeed> {
    let mnemonic = match request {
        GenerationRequest::Entropy(entropy) => bip39::Mnemonic::from_entropy(&entropy[..]),
        GenerationRequest::Passphrase(phrase) => bip39::Mnemonic::parse_normalized(phrase.trim()),
    }
    .map_err(|e| Error::Generation(sanitize_message(&e.to_string())))?;

    let seed_bytes = Zeroizing::new(mnemonic.to_seed(""));
    let seed = Seed::from_bytes(&seed_bytes[..])?;

    Ok(GeneratedSeed {
        seed,
        mnemonic: Mnemonic::new(mnemonic.to_string()),
    })
}

fn panic_text(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "seed generation failed".to_string()
    }
}

/// Strip wrapper text added at the worker boundary
pub fn sanitize_message(raw: &str) -> String {
    let mut message = raw.trim();
    while let Some(prefix) = WRAPPER_PREFIXES.iter().find(|p| message.starts_with(**p)) {
        message = message[prefix.len()..].trim_start();
    }
    message.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::generate_entropy;

    #[test]
    fn test_sanitize_message() {
        assert_eq!(sanitize_message("Uncaught Error: bad word"), "bad word");
        assert_eq!(sanitize_message("Error: Uncaught Error: x"), "x");
        assert_eq!(sanitize_message("  plain  "), "plain");
    }

    #[test]
    fn test_progress_messages() {
        assert_eq!(
            GenerationRequest::Entropy(generate_entropy()).progress_message(),
            "Generating"
        );
        assert_eq!(
            GenerationRequest::passphrase("x").progress_message(),
            "Decoding seed phrase"
        );
    }

    #[tokio::test]
    async fn test_entropy_generates_twelve_words() {
        let worker = GenerationWorker::spawn().unwrap();
        let generated = worker
            .generate(GenerationRequest::Entropy(generate_entropy()))
            .await
            .unwrap();
        assert_eq!(generated.mnemonic.word_count(), 12);
        assert_eq!(generated.seed.as_bytes().len(), 64);
    }

    #[tokio::test]
    async fn test_recovery_reproduces_seed() {
        let worker = GenerationWorker::spawn().unwrap();
        let created = worker
            .generate(GenerationRequest::Entropy(Zeroizing::new([9u8; ENTROPY_LEN])))
            .await
            .unwrap();
        let recovered = worker
            .generate(GenerationRequest::passphrase(created.mnemonic.phrase()))
            .await
            .unwrap();
        assert_eq!(recovered.seed, created.seed);
        assert_eq!(recovered.seed.identity(), created.seed.identity());
    }

    #[tokio::test]
    async fn test_invalid_passphrase_is_generation_error() {
        let worker = GenerationWorker::spawn().unwrap();
        let err = worker
            .generate(GenerationRequest::passphrase("definitely not a mnemonic"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Generation(msg) if !msg.starts_with("Error: ")));
    }
}
