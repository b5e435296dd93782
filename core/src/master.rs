use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use tokio::{fs::File, io::AsyncWriteExt};
use url::Url;

/// One logical file known to the master. `file_id` is the opaque key the
/// master uses for every per-file operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
	pub file_id: String,
	pub original_name: String,
	pub num_chunks: u64,
}

/// Last-observed liveness snapshot of one storage node, as reported by the
/// master. Purely descriptive; nothing client-side is derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatus {
	pub node_path: String,
	pub exists: bool,
	pub is_accessible: bool,
	pub chunk_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
	pub uploaded_as: String,
	#[serde(default)]
	pub original_name: Option<String>,
	#[serde(default)]
	pub chunks: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResult {
	pub status: String,
	#[serde(default)]
	pub download_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResult {
	pub status: String,
	#[serde(default)]
	pub file_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealResult {
	#[serde(default)]
	pub status: Option<String>,
	pub healed_chunks: u64,
}

#[derive(Deserialize)]
struct FileListing {
	files: Vec<FileEntry>,
}

#[derive(Deserialize)]
struct NodeListing {
	nodes: Vec<NodeStatus>,
}

/// Everything the dashboard needs from the master service. The GUI and the
/// one-shot subcommands hold this as `Arc<dyn MasterApi>` so tests can swap
/// in a recording mock.
#[async_trait]
pub trait MasterApi: Send + Sync {
	async fn list_files(&self) -> Result<Vec<FileEntry>>;
	async fn node_status(&self) -> Result<Vec<NodeStatus>>;
	async fn upload(&self, path: &Path) -> Result<UploadResult>;
	async fn download_link(&self, file_id: &str) -> Result<DownloadResult>;
	async fn delete(&self, file_id: &str) -> Result<DeleteResult>;
	async fn heal(&self, file_id: &str) -> Result<HealResult>;
	/// Fetch a master-relative `download_url` and write it to disk under
	/// `original_name`, returning the saved path.
	async fn save_download(&self, download_url: &str, original_name: &str) -> Result<PathBuf>;
}

/// HTTP client for the master's JSON API. Stateless apart from the base URL;
/// no retries and no timeout beyond reqwest's defaults.
pub struct MasterClient {
	base: Url,
	client: reqwest::Client,
}

impl MasterClient {
	pub fn new(base: &str) -> Result<Self> {
		let base = Url::parse(base).with_context(|| format!("invalid master url: {base}"))?;
		Ok(Self::with_base(base))
	}

	pub fn with_base(mut base: Url) -> Self {
		// Endpoint paths are joined relative to the base, so a path prefix
		// without a trailing slash would be dropped by Url::join.
		if !base.path().ends_with('/') {
			let path = format!("{}/", base.path());
			base.set_path(&path);
		}
		MasterClient {
			base,
			client: reqwest::Client::new(),
		}
	}

	pub fn base(&self) -> &Url {
		&self.base
	}

	fn endpoint(&self, path: &str) -> Result<Url> {
		Ok(self.base.join(path)?)
	}

	async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
		let res = self
			.client
			.get(self.endpoint(path)?)
			.send()
			.await?
			.error_for_status()?;
		Ok(res.json::<T>().await?)
	}
}

#[async_trait]
impl MasterApi for MasterClient {
	async fn list_files(&self) -> Result<Vec<FileEntry>> {
		let listing: FileListing = self.get_json("files").await?;
		Ok(listing.files)
	}

	async fn node_status(&self) -> Result<Vec<NodeStatus>> {
		let listing: NodeListing = self.get_json("node-status").await?;
		Ok(listing.nodes)
	}

	async fn upload(&self, path: &Path) -> Result<UploadResult> {
		let file_name = path
			.file_name()
			.and_then(|name| name.to_str())
			.map(|name| name.to_string())
			.unwrap_or_else(|| String::from("upload.bin"));
		let bytes = tokio::fs::read(path)
			.await
			.with_context(|| format!("failed to read {}", path.display()))?;
		log::info!("uploading {} ({} bytes)", file_name, bytes.len());
		let part = multipart::Part::bytes(bytes).file_name(file_name);
		let form = multipart::Form::new().part("file", part);
		let res = self
			.client
			.post(self.endpoint("upload")?)
			.multipart(form)
			.send()
			.await?
			.error_for_status()?;
		Ok(res.json().await?)
	}

	async fn download_link(&self, file_id: &str) -> Result<DownloadResult> {
		self.get_json(&format!("download/{file_id}")).await
	}

	async fn delete(&self, file_id: &str) -> Result<DeleteResult> {
		let res = self
			.client
			.delete(self.endpoint(&format!("delete/{file_id}"))?)
			.send()
			.await?
			.error_for_status()?;
		Ok(res.json().await?)
	}

	async fn heal(&self, file_id: &str) -> Result<HealResult> {
		let res = self
			.client
			.post(self.endpoint(&format!("heal/{file_id}"))?)
			.send()
			.await?
			.error_for_status()?;
		Ok(res.json().await?)
	}

	async fn save_download(&self, download_url: &str, original_name: &str) -> Result<PathBuf> {
		let url = self.base.join(download_url)?;
		let res = self.client.get(url.clone()).send().await?;
		if !res.status().is_success() {
			bail!("failed to fetch {}. HTTP status: {}", url, res.status());
		}
		let bytes = res.bytes().await?;
		// The name comes from the master; keep only the final component so a
		// listing entry can never write outside the download directory.
		let name = Path::new(original_name)
			.file_name()
			.and_then(|name| name.to_str())
			.unwrap_or("downloaded_file");
		let path = download_dir().join(name);
		log::info!("saving download to {:?}", path);
		let mut file = File::create(&path).await?;
		file.write_all(&bytes).await?;
		Ok(path)
	}
}

/// Resolve a short-lived download pointer for `file_id` and materialize it on
/// disk. No bytes are fetched unless the master reports success and returns a
/// URL.
pub async fn fetch_to_disk(
	api: &dyn MasterApi,
	file_id: &str,
	original_name: &str,
) -> Result<PathBuf> {
	let link = api.download_link(file_id).await?;
	let url = match link.download_url {
		Some(url) if link.status == "success" => url,
		_ => bail!("master reported download failure for {file_id}"),
	};
	api.save_download(&url, original_name).await
}

fn download_dir() -> PathBuf {
	homedir::my_home()
		.ok()
		.flatten()
		.map(|home| home.join("Downloads"))
		.filter(|dir| dir.exists())
		.unwrap_or_else(std::env::temp_dir)
}
