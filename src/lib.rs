pub mod client;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod locator;
pub mod logger;
pub mod models;
pub mod notify;

pub use client::{
    DownloadReport, Downloader, FetchedImage, FileSaver, HttpImageFetcher, ImageFetcher,
    ImageSaver,
};
pub use clock::{FixedClock, SystemClock, TimeSource};
pub use config::{DownloadPolicy, StudioConfig};
pub use coordinator::BatchImageRequestCoordinator;
pub use error::{CinegenError, Result};
pub use locator::LocatorTemplate;
pub use models::*;
pub use notify::{LogNotifier, MemoryNotifier, Notification, Notifier, Severity};
