//! # level-shot-host
//!
//! Host-side collaborators for level-shot.
//!
//! Provides:
//! - `ReplayOrientationSource`: tilt readings replayed on a sensor thread
//! - `FrameCamera`: snapshots the latest preview frame into a staging directory
//! - `AlbumStore`: photo library writing into a named album directory
//!
//! ## Usage
//! ```ignore
//! use level_shot_core::{AutoCaptureSession, TriggerConfiguration};
//! use level_shot_host::{AlbumStore, FrameCamera, ReplayOrientationSource};
//!
//! let source = ReplayOrientationSource::from_json_file(path, Duration::from_millis(100))?;
//! let camera = FrameCamera::new(staging_dir);
//! let album = AlbumStore::with_default_album(library_root);
//! let session = AutoCaptureSession::new(source, camera, album, TriggerConfiguration::default())?;
//! ```

pub mod album_store;
pub mod frame_camera;
pub mod replay_source;

pub use album_store::{AlbumStore, DEFAULT_ALBUM};
pub use frame_camera::{FrameCamera, FrameFeed};
pub use replay_source::ReplayOrientationSource;
