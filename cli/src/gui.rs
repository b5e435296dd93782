use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chunkboard_core::{
	DeleteResult, FileEntry, HealResult, MasterApi, NodeStatus, UploadResult, master,
};
use iced::executor;
use iced::theme;
use iced::time;
use iced::widget::{button, container, scrollable, text, text_input, tooltip};
use iced::{Application, Command, Element, Length, Settings, Subscription, Theme};

const REFRESH_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RowAction {
	Download,
	Delete,
	Heal,
}

pub struct GuiFlags {
	pub app_title: String,
	pub api: Arc<dyn MasterApi>,
}

pub struct GuiApp {
	api: Arc<dyn MasterApi>,
	app_title: String,
	files: Vec<FileEntry>,
	files_error: Option<String>,
	files_loading: bool,
	nodes: Vec<NodeStatus>,
	nodes_error: Option<String>,
	nodes_loading: bool,
	upload_path: String,
	uploading: bool,
	/// Delete awaiting operator confirmation: (file_id, original_name).
	pending_delete: Option<(String, String)>,
	/// Row operations currently in flight; their buttons stay disabled so a
	/// double click cannot fire the same command twice.
	pending: HashSet<(String, RowAction)>,
	status: String,
}

#[derive(Debug, Clone)]
pub enum GuiMessage {
	Tick,
	FilesLoaded(Result<Vec<FileEntry>, String>),
	NodesLoaded(Result<Vec<NodeStatus>, String>),
	UploadPathChanged(String),
	UploadRequested,
	UploadFinished {
		result: Result<UploadResult, String>,
		files: Result<Vec<FileEntry>, String>,
	},
	DownloadRequested {
		file_id: String,
		original_name: String,
	},
	DownloadFinished {
		file_id: String,
		result: Result<PathBuf, String>,
	},
	DeleteRequested {
		file_id: String,
		original_name: String,
	},
	DeleteCancelled,
	DeleteConfirmed,
	DeleteFinished {
		file_id: String,
		result: Result<DeleteResult, String>,
		files: Result<Vec<FileEntry>, String>,
	},
	HealRequested(String),
	HealFinished {
		file_id: String,
		result: Result<HealResult, String>,
		files: Result<Vec<FileEntry>, String>,
	},
}

fn map_result<T>(result: anyhow::Result<T>) -> Result<T, String> {
	result.map_err(|err| format!("{err}"))
}

async fn load_files(api: Arc<dyn MasterApi>) -> Result<Vec<FileEntry>, String> {
	map_result(api.list_files().await)
}

async fn load_nodes(api: Arc<dyn MasterApi>) -> Result<Vec<NodeStatus>, String> {
	map_result(api.node_status().await)
}

async fn upload_and_refresh(
	api: Arc<dyn MasterApi>,
	path: PathBuf,
) -> (Result<UploadResult, String>, Result<Vec<FileEntry>, String>) {
	let result = map_result(api.upload(&path).await);
	let files = load_files(api).await;
	(result, files)
}

async fn delete_and_refresh(
	api: Arc<dyn MasterApi>,
	file_id: String,
) -> (String, Result<DeleteResult, String>, Result<Vec<FileEntry>, String>) {
	let result = map_result(api.delete(&file_id).await);
	// The table reflects the master's post-delete state even if the delete
	// itself failed or no-oped.
	let files = load_files(api).await;
	(file_id, result, files)
}

async fn heal_and_refresh(
	api: Arc<dyn MasterApi>,
	file_id: String,
) -> (String, Result<HealResult, String>, Result<Vec<FileEntry>, String>) {
	let result = map_result(api.heal(&file_id).await);
	let files = load_files(api).await;
	(file_id, result, files)
}

async fn download_file(
	api: Arc<dyn MasterApi>,
	file_id: String,
	original_name: String,
) -> (String, Result<PathBuf, String>) {
	let result = master::fetch_to_disk(api.as_ref(), &file_id, &original_name).await;
	(file_id, map_result(result))
}

fn presence_label(exists: bool) -> &'static str {
	if exists { "🟢 Online" } else { "🔴 Offline" }
}

fn access_label(accessible: bool) -> &'static str {
	if accessible { "✔️ Yes" } else { "❌ No" }
}

impl Application for GuiApp {
	type Executor = executor::Default;
	type Message = GuiMessage;
	type Theme = Theme;
	type Flags = GuiFlags;

	fn new(flags: Self::Flags) -> (Self, Command<Self::Message>) {
		let app = GuiApp {
			api: flags.api,
			app_title: flags.app_title,
			files: Vec::new(),
			files_error: None,
			files_loading: true,
			nodes: Vec::new(),
			nodes_error: None,
			nodes_loading: true,
			upload_path: String::new(),
			uploading: false,
			pending_delete: None,
			pending: HashSet::new(),
			status: String::from("Loading cluster state..."),
		};
		// The two initial fetches are independent; either may land first.
		let command = Command::batch(vec![
			Command::perform(load_files(app.api.clone()), GuiMessage::FilesLoaded),
			Command::perform(load_nodes(app.api.clone()), GuiMessage::NodesLoaded),
		]);
		(app, command)
	}

	fn title(&self) -> String {
		self.app_title.clone()
	}

	fn theme(&self) -> Theme {
		Theme::Dark
	}

	fn subscription(&self) -> Subscription<Self::Message> {
		time::every(REFRESH_INTERVAL).map(|_| GuiMessage::Tick)
	}

	fn update(&mut self, message: Self::Message) -> Command<Self::Message> {
		match message {
			GuiMessage::Tick => Command::batch(vec![
				Command::perform(load_files(self.api.clone()), GuiMessage::FilesLoaded),
				Command::perform(load_nodes(self.api.clone()), GuiMessage::NodesLoaded),
			]),
			GuiMessage::FilesLoaded(files) => {
				if let Err(err) = &files {
					self.status = format!("File listing unavailable: {err}");
				}
				self.apply_files(files);
				Command::none()
			}
			GuiMessage::NodesLoaded(nodes) => {
				self.nodes_loading = false;
				match nodes {
					Ok(nodes) => {
						self.nodes = nodes;
						self.nodes_error = None;
					}
					Err(err) => {
						self.status = format!("Node status unavailable: {err}");
						self.nodes_error = Some(err);
					}
				}
				Command::none()
			}
			GuiMessage::UploadPathChanged(path) => {
				self.upload_path = path;
				Command::none()
			}
			GuiMessage::UploadRequested => {
				if self.uploading {
					return Command::none();
				}
				let path = self.upload_path.trim().to_string();
				if path.is_empty() {
					self.status = String::from("Select a file to upload first.");
					return Command::none();
				}
				self.uploading = true;
				self.status = format!("Uploading {}...", path);
				Command::perform(
					upload_and_refresh(self.api.clone(), PathBuf::from(path)),
					|(result, files)| GuiMessage::UploadFinished { result, files },
				)
			}
			GuiMessage::UploadFinished { result, files } => {
				self.uploading = false;
				self.apply_files(files);
				match result {
					Ok(result) => {
						self.status = format!("Upload complete, stored as {}", result.uploaded_as);
						self.upload_path.clear();
					}
					Err(err) => {
						self.status = format!("Upload failed: {err}");
					}
				}
				Command::none()
			}
			GuiMessage::DownloadRequested {
				file_id,
				original_name,
			} => {
				if !self.pending.insert((file_id.clone(), RowAction::Download)) {
					return Command::none();
				}
				self.status = format!("Downloading {}...", original_name);
				Command::perform(
					download_file(self.api.clone(), file_id, original_name),
					|(file_id, result)| GuiMessage::DownloadFinished { file_id, result },
				)
			}
			GuiMessage::DownloadFinished { file_id, result } => {
				self.pending.remove(&(file_id.clone(), RowAction::Download));
				match result {
					Ok(path) => {
						self.status = format!("Saved {} to {}", file_id, path.display());
					}
					Err(err) => {
						self.status = format!("Download of {} failed: {err}", file_id);
					}
				}
				Command::none()
			}
			GuiMessage::DeleteRequested {
				file_id,
				original_name,
			} => {
				self.status = format!("Confirm deletion of {}", original_name);
				self.pending_delete = Some((file_id, original_name));
				Command::none()
			}
			GuiMessage::DeleteCancelled => {
				self.pending_delete = None;
				self.status = String::from("Delete cancelled");
				Command::none()
			}
			GuiMessage::DeleteConfirmed => {
				let Some((file_id, original_name)) = self.pending_delete.take() else {
					return Command::none();
				};
				if !self.pending.insert((file_id.clone(), RowAction::Delete)) {
					return Command::none();
				}
				self.status = format!("Deleting {}...", original_name);
				Command::perform(
					delete_and_refresh(self.api.clone(), file_id),
					|(file_id, result, files)| GuiMessage::DeleteFinished {
						file_id,
						result,
						files,
					},
				)
			}
			GuiMessage::DeleteFinished {
				file_id,
				result,
				files,
			} => {
				self.pending.remove(&(file_id.clone(), RowAction::Delete));
				self.apply_files(files);
				match result {
					Ok(result) if result.status == "deleted" => {
						self.status = format!("Deleted {}", file_id);
					}
					Ok(result) => {
						self.status =
							format!("Delete of {} reported status {}", file_id, result.status);
					}
					Err(err) => {
						self.status = format!("Failed to delete {}: {err}", file_id);
					}
				}
				Command::none()
			}
			GuiMessage::HealRequested(file_id) => {
				if !self.pending.insert((file_id.clone(), RowAction::Heal)) {
					return Command::none();
				}
				self.status = format!("Healing {}...", file_id);
				Command::perform(
					heal_and_refresh(self.api.clone(), file_id),
					|(file_id, result, files)| GuiMessage::HealFinished {
						file_id,
						result,
						files,
					},
				)
			}
			GuiMessage::HealFinished {
				file_id,
				result,
				files,
			} => {
				self.pending.remove(&(file_id.clone(), RowAction::Heal));
				self.apply_files(files);
				match result {
					Ok(result) => {
						self.status =
							format!("Healed {} chunks for {}", result.healed_chunks, file_id);
					}
					Err(err) => {
						self.status = format!("Failed to heal {}: {err}", file_id);
					}
				}
				Command::none()
			}
		}
	}

	fn view(&self) -> Element<'_, Self::Message> {
		let mut layout = iced::widget::Column::new().spacing(12).padding(12);
		let header = iced::widget::Row::new()
			.spacing(12)
			.push(text(&self.app_title).size(24))
			.push(button(text("Refresh")).on_press(GuiMessage::Tick));
		layout = layout.push(header);
		layout = layout.push(self.view_upload_controls());
		if let Some((_, original_name)) = &self.pending_delete {
			let banner = iced::widget::Row::new()
				.spacing(12)
				.push(text(format!("Delete {}? This cannot be undone.", original_name)).size(16))
				.push(button(text("Confirm")).on_press(GuiMessage::DeleteConfirmed))
				.push(button(text("Cancel")).on_press(GuiMessage::DeleteCancelled));
			layout = layout.push(container(banner).padding(8).style(theme::Container::Box));
		}
		layout = layout.push(self.view_file_table());
		layout = layout.push(self.view_node_table());
		let status = container(text(&self.status).size(16))
			.width(Length::Fill)
			.padding(12)
			.style(theme::Container::Box);
		layout.push(status).into()
	}
}

impl GuiApp {
	fn apply_files(&mut self, files: Result<Vec<FileEntry>, String>) {
		self.files_loading = false;
		match files {
			Ok(files) => {
				self.files = files;
				self.files_error = None;
			}
			Err(err) => {
				// Keep whatever was rendered last; stale rows beat an empty
				// table when the master is unreachable.
				self.files_error = Some(err);
			}
		}
	}

	fn view_upload_controls(&self) -> Element<'_, GuiMessage> {
		let input = text_input("Path of the file to upload", &self.upload_path)
			.padding(8)
			.size(16)
			.on_input(GuiMessage::UploadPathChanged);
		let mut upload_button = button(text(if self.uploading {
			"Uploading..."
		} else {
			"Upload"
		}));
		if !self.uploading {
			upload_button = upload_button.on_press(GuiMessage::UploadRequested);
		}
		iced::widget::Row::new()
			.spacing(12)
			.push(input)
			.push(upload_button)
			.into()
	}

	fn view_file_table(&self) -> Element<'_, GuiMessage> {
		let mut layout = iced::widget::Column::new().spacing(8);
		layout = layout.push(text("Stored Files").size(20));
		if let Some(err) = &self.files_error {
			layout = layout.push(text(format!("File listing unavailable: {err}")).size(14));
		}
		if self.files_loading {
			return layout.push(text("Loading files...").size(16)).into();
		}
		if self.files.is_empty() {
			layout = layout.push(text("No files stored yet.").size(16));
			return layout.into();
		}
		let mut list = iced::widget::Column::new().spacing(4);
		for file in &self.files {
			let name_cell = container(
				tooltip(
					text(file.original_name.clone()).size(16),
					text(file.file_id.clone()),
					tooltip::Position::FollowCursor,
				)
				.style(theme::Container::Box),
			)
			.width(Length::FillPortion(3));
			let mut download_button = button(text("Download"));
			if !self
				.pending
				.contains(&(file.file_id.clone(), RowAction::Download))
			{
				download_button = download_button.on_press(GuiMessage::DownloadRequested {
					file_id: file.file_id.clone(),
					original_name: file.original_name.clone(),
				});
			}
			let mut delete_button = button(text("Delete"));
			if !self
				.pending
				.contains(&(file.file_id.clone(), RowAction::Delete))
			{
				delete_button = delete_button.on_press(GuiMessage::DeleteRequested {
					file_id: file.file_id.clone(),
					original_name: file.original_name.clone(),
				});
			}
			let mut heal_button = button(text("Heal"));
			if !self
				.pending
				.contains(&(file.file_id.clone(), RowAction::Heal))
			{
				heal_button = heal_button.on_press(GuiMessage::HealRequested(file.file_id.clone()));
			}
			let info = iced::widget::Row::new()
				.spacing(12)
				.push(name_cell)
				.push(
					text(format!("{} chunks", file.num_chunks))
						.size(14)
						.width(Length::FillPortion(1)),
				)
				.push(download_button)
				.push(delete_button)
				.push(heal_button);
			let card = container(info).padding(8).style(theme::Container::Box);
			list = list.push(card);
		}
		layout = layout.push(scrollable(list).height(Length::FillPortion(3)));
		layout.into()
	}

	fn view_node_table(&self) -> Element<'_, GuiMessage> {
		let mut layout = iced::widget::Column::new().spacing(8);
		layout = layout.push(text("Storage Nodes").size(20));
		if let Some(err) = &self.nodes_error {
			layout = layout.push(text(format!("Node status unavailable: {err}")).size(14));
		}
		if self.nodes_loading {
			return layout.push(text("Loading node status...").size(16)).into();
		}
		if self.nodes.is_empty() {
			layout = layout.push(text("No storage nodes reported.").size(16));
			return layout.into();
		}
		let mut list = iced::widget::Column::new().spacing(4);
		for node in &self.nodes {
			let info = iced::widget::Row::new()
				.spacing(12)
				.push(
					text(node.node_path.clone())
						.size(14)
						.width(Length::FillPortion(3)),
				)
				.push(
					text(presence_label(node.exists))
						.size(14)
						.width(Length::FillPortion(1)),
				)
				.push(
					text(access_label(node.is_accessible))
						.size(14)
						.width(Length::FillPortion(1)),
				)
				.push(
					text(format!("{} chunks", node.chunk_count))
						.size(14)
						.width(Length::FillPortion(1)),
				);
			let card = container(info).padding(8).style(theme::Container::Box);
			list = list.push(card);
		}
		layout = layout.push(scrollable(list).height(Length::FillPortion(2)));
		layout.into()
	}
}

pub fn run(app_title: String, api: Arc<dyn MasterApi>) -> iced::Result {
	let mut settings = Settings::with_flags(GuiFlags { app_title, api });
	settings.window.size = iced::Size::new(1024.0, 720.0);
	GuiApp::run(settings)
}

#[cfg(test)]
mod tests {
	use super::*;

	use std::path::Path;
	use std::sync::Mutex;

	use async_trait::async_trait;
	use chunkboard_core::DownloadResult;

	#[derive(Debug, Clone, PartialEq, Eq)]
	enum Call {
		ListFiles,
		NodeStatus,
		Upload(PathBuf),
		DownloadLink(String),
		Delete(String),
		Heal(String),
		SaveDownload(String, String),
	}

	struct MockMaster {
		calls: Mutex<Vec<Call>>,
		files: Vec<FileEntry>,
		download: DownloadResult,
		delete_status: String,
		healed_chunks: u64,
	}

	impl Default for MockMaster {
		fn default() -> Self {
			MockMaster {
				calls: Mutex::new(Vec::new()),
				files: Vec::new(),
				download: DownloadResult {
					status: String::from("success"),
					download_url: Some(String::from("/static/downloads/a.txt")),
				},
				delete_status: String::from("deleted"),
				healed_chunks: 2,
			}
		}
	}

	impl MockMaster {
		fn record(&self, call: Call) {
			self.calls.lock().expect("calls lock").push(call);
		}

		fn calls(&self) -> Vec<Call> {
			self.calls.lock().expect("calls lock").clone()
		}
	}

	#[async_trait]
	impl MasterApi for MockMaster {
		async fn list_files(&self) -> anyhow::Result<Vec<FileEntry>> {
			self.record(Call::ListFiles);
			Ok(self.files.clone())
		}

		async fn node_status(&self) -> anyhow::Result<Vec<NodeStatus>> {
			self.record(Call::NodeStatus);
			Ok(Vec::new())
		}

		async fn upload(&self, path: &Path) -> anyhow::Result<UploadResult> {
			self.record(Call::Upload(path.to_path_buf()));
			Ok(UploadResult {
				uploaded_as: String::from("a.txt_1700000000"),
				original_name: Some(String::from("a.txt")),
				chunks: Some(3),
			})
		}

		async fn download_link(&self, file_id: &str) -> anyhow::Result<DownloadResult> {
			self.record(Call::DownloadLink(file_id.to_string()));
			Ok(self.download.clone())
		}

		async fn delete(&self, file_id: &str) -> anyhow::Result<DeleteResult> {
			self.record(Call::Delete(file_id.to_string()));
			Ok(DeleteResult {
				status: self.delete_status.clone(),
				file_id: Some(file_id.to_string()),
			})
		}

		async fn heal(&self, file_id: &str) -> anyhow::Result<HealResult> {
			self.record(Call::Heal(file_id.to_string()));
			Ok(HealResult {
				status: Some(String::from("success")),
				healed_chunks: self.healed_chunks,
			})
		}

		async fn save_download(
			&self,
			download_url: &str,
			original_name: &str,
		) -> anyhow::Result<PathBuf> {
			self.record(Call::SaveDownload(
				download_url.to_string(),
				original_name.to_string(),
			));
			Ok(PathBuf::from("/tmp/mock-download"))
		}
	}

	fn new_app(mock: Arc<MockMaster>) -> GuiApp {
		let (app, _) = GuiApp::new(GuiFlags {
			app_title: String::from("Test"),
			api: mock,
		});
		app
	}

	fn block_on<F: std::future::Future>(future: F) -> F::Output {
		tokio::runtime::Runtime::new()
			.expect("runtime")
			.block_on(future)
	}

	fn sample_file(file_id: &str, original_name: &str, num_chunks: u64) -> FileEntry {
		FileEntry {
			file_id: file_id.to_string(),
			original_name: original_name.to_string(),
			num_chunks,
		}
	}

	#[test]
	fn listing_renders_rows_in_server_order() {
		let mock = Arc::new(MockMaster::default());
		let mut app = new_app(mock);
		let files = vec![sample_file("f2", "b.bin", 1), sample_file("f1", "a.txt", 3)];
		let _ = app.update(GuiMessage::FilesLoaded(Ok(files.clone())));
		assert_eq!(app.files, files);
		assert!(app.files_error.is_none());
		// Re-delivering the same listing leaves the table identical.
		let _ = app.update(GuiMessage::FilesLoaded(Ok(files.clone())));
		assert_eq!(app.files, files);
	}

	#[test]
	fn listing_failure_keeps_previous_rows() {
		let mock = Arc::new(MockMaster::default());
		let mut app = new_app(mock);
		let files = vec![sample_file("f1", "a.txt", 3)];
		let _ = app.update(GuiMessage::FilesLoaded(Ok(files.clone())));
		let _ = app.update(GuiMessage::FilesLoaded(Err(String::from("connection refused"))));
		assert_eq!(app.files, files);
		assert_eq!(app.files_error.as_deref(), Some("connection refused"));
		assert!(app.status.contains("File listing unavailable"));
	}

	#[test]
	fn upload_without_file_sends_nothing() {
		let mock = Arc::new(MockMaster::default());
		let mut app = new_app(mock.clone());
		let _ = app.update(GuiMessage::UploadRequested);
		assert!(app.status.contains("Select a file"));
		assert!(!app.uploading);
		assert!(mock.calls().is_empty());
	}

	#[test]
	fn upload_reports_server_assigned_name() {
		let mock = Arc::new(MockMaster::default());
		let mut app = new_app(mock);
		let _ = app.update(GuiMessage::UploadFinished {
			result: Ok(UploadResult {
				uploaded_as: String::from("a.txt_1700000000"),
				original_name: None,
				chunks: None,
			}),
			files: Ok(Vec::new()),
		});
		assert!(app.status.contains("a.txt_1700000000"));
		assert!(!app.uploading);
	}

	#[test]
	fn delete_requires_confirmation() {
		let mock = Arc::new(MockMaster::default());
		let mut app = new_app(mock.clone());
		let _ = app.update(GuiMessage::DeleteRequested {
			file_id: String::from("f1"),
			original_name: String::from("a.txt"),
		});
		assert!(app.pending_delete.is_some());
		assert!(mock.calls().is_empty());
		let _ = app.update(GuiMessage::DeleteCancelled);
		assert!(app.pending_delete.is_none());
		assert!(mock.calls().is_empty());
	}

	#[test]
	fn delete_workflow_issues_one_request_and_one_refresh() {
		let mock = Arc::new(MockMaster::default());
		let api: Arc<dyn MasterApi> = mock.clone();
		let (file_id, result, files) = block_on(delete_and_refresh(api, String::from("f1")));
		assert_eq!(file_id, "f1");
		assert_eq!(result.expect("delete").status, "deleted");
		assert!(files.is_ok());
		assert_eq!(
			mock.calls(),
			vec![Call::Delete(String::from("f1")), Call::ListFiles]
		);
	}

	#[test]
	fn delete_refreshes_even_when_master_reports_failure() {
		let mock = Arc::new(MockMaster {
			delete_status: String::from("missing"),
			..MockMaster::default()
		});
		let api: Arc<dyn MasterApi> = mock.clone();
		let (file_id, result, _) = block_on(delete_and_refresh(api, String::from("f1")));
		assert_eq!(
			mock.calls(),
			vec![Call::Delete(String::from("f1")), Call::ListFiles]
		);
		let mut app = new_app(mock);
		let _ = app.update(GuiMessage::DeleteFinished {
			file_id,
			result,
			files: Ok(Vec::new()),
		});
		assert!(app.status.contains("reported status missing"));
	}

	#[test]
	fn heal_workflow_issues_one_request_and_one_refresh() {
		let mock = Arc::new(MockMaster::default());
		let api: Arc<dyn MasterApi> = mock.clone();
		let (file_id, result, files) = block_on(heal_and_refresh(api, String::from("f1")));
		assert_eq!(
			mock.calls(),
			vec![Call::Heal(String::from("f1")), Call::ListFiles]
		);
		let mut app = new_app(mock);
		let _ = app.update(GuiMessage::HealFinished {
			file_id,
			result,
			files,
		});
		assert!(app.status.contains("Healed 2 chunks"));
	}

	#[test]
	fn failed_download_saves_nothing() {
		let mock = Arc::new(MockMaster {
			download: DownloadResult {
				status: String::from("error"),
				download_url: None,
			},
			..MockMaster::default()
		});
		let api: Arc<dyn MasterApi> = mock.clone();
		let (_, result) = block_on(download_file(
			api,
			String::from("f1"),
			String::from("a.txt"),
		));
		assert!(result.is_err());
		assert_eq!(mock.calls(), vec![Call::DownloadLink(String::from("f1"))]);
	}

	#[test]
	fn download_with_success_but_missing_url_saves_nothing() {
		let mock = Arc::new(MockMaster {
			download: DownloadResult {
				status: String::from("success"),
				download_url: None,
			},
			..MockMaster::default()
		});
		let api: Arc<dyn MasterApi> = mock.clone();
		let (_, result) = block_on(download_file(
			api,
			String::from("f1"),
			String::from("a.txt"),
		));
		assert!(result.is_err());
		assert_eq!(mock.calls(), vec![Call::DownloadLink(String::from("f1"))]);
	}

	#[test]
	fn successful_download_saves_under_original_name() {
		let mock = Arc::new(MockMaster::default());
		let api: Arc<dyn MasterApi> = mock.clone();
		let (_, result) = block_on(download_file(
			api,
			String::from("f1"),
			String::from("a.txt"),
		));
		assert!(result.is_ok());
		assert_eq!(
			mock.calls(),
			vec![
				Call::DownloadLink(String::from("f1")),
				Call::SaveDownload(
					String::from("/static/downloads/a.txt"),
					String::from("a.txt")
				),
			]
		);
	}

	#[test]
	fn in_flight_heal_is_not_duplicated() {
		let mock = Arc::new(MockMaster::default());
		let mut app = new_app(mock);
		let _ = app.update(GuiMessage::HealRequested(String::from("f1")));
		assert!(app.pending.contains(&(String::from("f1"), RowAction::Heal)));
		let _ = app.update(GuiMessage::HealRequested(String::from("f1")));
		// Still exactly one pending entry; the second click was a no-op.
		assert_eq!(app.pending.len(), 1);
		let _ = app.update(GuiMessage::HealFinished {
			file_id: String::from("f1"),
			result: Ok(HealResult {
				status: None,
				healed_chunks: 0,
			}),
			files: Ok(Vec::new()),
		});
		assert!(app.pending.is_empty());
	}

	#[test]
	fn node_rows_render_liveness_independently() {
		let mock = Arc::new(MockMaster::default());
		let mut app = new_app(mock);
		let _ = app.update(GuiMessage::NodesLoaded(Ok(vec![NodeStatus {
			node_path: String::from("/n1"),
			exists: true,
			is_accessible: false,
			chunk_count: 5,
		}])));
		assert_eq!(app.nodes.len(), 1);
		assert_eq!(app.nodes[0].chunk_count, 5);
		assert!(presence_label(app.nodes[0].exists).contains("Online"));
		assert!(access_label(app.nodes[0].is_accessible).contains("No"));
	}
}
