pub mod master;

pub use master::{
	DeleteResult, DownloadResult, FileEntry, HealResult, MasterApi, MasterClient, NodeStatus,
	UploadResult, fetch_to_disk,
};
