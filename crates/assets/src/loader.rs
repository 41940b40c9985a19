use crate::AssetError;
use crate::rig::{CharacterRig, RigManifest};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Outcome of one poll of a pending load.
#[derive(Debug)]
pub enum AssetLoad<T> {
    Pending,
    Ready(T),
    Failed(AssetError),
}

/// The receiving end of a load in flight.
///
/// The producer sends exactly one result. Once it has been handed out by
/// [`poll`](Self::poll), later polls report [`AssetError::LoaderDisconnected`].
#[derive(Debug)]
pub struct PendingAsset<T> {
    rx: Receiver<Result<T, AssetError>>,
}

impl<T> PendingAsset<T> {
    pub fn channel() -> (Sender<Result<T, AssetError>>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }

    /// Already settled with `value`.
    pub fn ready(value: T) -> Self {
        Self::settled(Ok(value))
    }

    pub fn failed(err: AssetError) -> Self {
        Self::settled(Err(err))
    }

    fn settled(result: Result<T, AssetError>) -> Self {
        let (tx, pending) = Self::channel();
        // The receiver is alive, so this cannot fail.
        let _ = tx.send(result);
        pending
    }

    /// Non-blocking check for the result.
    pub fn poll(&mut self) -> AssetLoad<T> {
        match self.rx.try_recv() {
            Ok(Ok(value)) => AssetLoad::Ready(value),
            Ok(Err(err)) => AssetLoad::Failed(err),
            Err(TryRecvError::Empty) => AssetLoad::Pending,
            Err(TryRecvError::Disconnected) => AssetLoad::Failed(AssetError::LoaderDisconnected),
        }
    }
}

/// Something that can start a character rig load.
pub trait RigLoader {
    fn load(&self, path: &Path) -> PendingAsset<CharacterRig>;
}

/// Reads a JSON rig manifest on a worker thread.
#[derive(Debug, Clone, Default)]
pub struct FileRigLoader {
    root: Option<PathBuf>,
}

impl FileRigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative manifest paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl RigLoader for FileRigLoader {
    fn load(&self, path: &Path) -> PendingAsset<CharacterRig> {
        let path = self.resolve(path);
        let (tx, pending) = PendingAsset::channel();
        let spawned = std::thread::Builder::new()
            .name("rig-loader".into())
            .spawn(move || {
                let result = RigManifest::load(&path).and_then(CharacterRig::from_manifest);
                if let Err(ref e) = result {
                    tracing::debug!(path = %path.display(), error = %e, "rig load failed on worker");
                }
                // The session may have been dropped; nobody is left to tell.
                let _ = tx.send(result);
            });
        match spawned {
            Ok(_) => pending,
            Err(e) => PendingAsset::failed(AssetError::Io(e)),
        }
    }
}
