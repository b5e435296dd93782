use std::path::PathBuf;
use std::sync::Arc;

use args::Command;
use chunkboard_core::{MasterApi, MasterClient, fetch_to_disk};
use clap::Parser;

mod args;
mod gui;

#[tokio::main]
async fn main() {
	let args = args::Args::parse();
	simple_logger::init_with_level(log::Level::Info).unwrap();

	let client = match MasterClient::new(&args.master) {
		Ok(client) => client,
		Err(err) => {
			log::error!("invalid --master url {}: {err}", args.master);
			std::process::exit(1);
		}
	};
	let api: Arc<dyn MasterApi> = Arc::new(client);

	match &args.command {
		Some(Command::Files) => match api.list_files().await {
			Ok(files) => {
				for file in files {
					println!("{}\t{}\t{} chunks", file.file_id, file.original_name, file.num_chunks);
				}
			}
			Err(err) => {
				log::error!("failed to list files: {err:?}");
				std::process::exit(1);
			}
		},
		Some(Command::Nodes) => match api.node_status().await {
			Ok(nodes) => {
				for node in nodes {
					println!(
						"{}\t{}\t{}\t{} chunks",
						node.node_path,
						if node.exists { "online" } else { "offline" },
						if node.is_accessible { "accessible" } else { "inaccessible" },
						node.chunk_count
					);
				}
			}
			Err(err) => {
				log::error!("failed to fetch node status: {err:?}");
				std::process::exit(1);
			}
		},
		Some(Command::Upload { path }) => match api.upload(&PathBuf::from(path)).await {
			Ok(result) => {
				log::info!("upload complete, stored as {}", result.uploaded_as);
			}
			Err(err) => {
				log::error!("failed to upload {}: {err:?}", path);
				std::process::exit(1);
			}
		},
		Some(Command::Download { file_id }) => {
			// The listing is the only place the original name lives.
			let original_name = match api.list_files().await {
				Ok(files) => files
					.into_iter()
					.find(|file| file.file_id == *file_id)
					.map(|file| file.original_name),
				Err(err) => {
					log::error!("failed to list files: {err:?}");
					std::process::exit(1);
				}
			};
			let original_name = original_name.unwrap_or_else(|| file_id.clone());
			match fetch_to_disk(api.as_ref(), file_id, &original_name).await {
				Ok(path) => {
					log::info!("saved {} to {:?}", original_name, path);
				}
				Err(err) => {
					log::error!("failed to download {}: {err:?}", file_id);
					std::process::exit(1);
				}
			}
		}
		Some(Command::Delete { file_id, yes }) => {
			if !*yes {
				log::warn!("refusing to delete {} without --yes", file_id);
				std::process::exit(1);
			}
			match api.delete(file_id).await {
				Ok(result) if result.status == "deleted" => {
					log::info!("deleted {}", file_id);
				}
				Ok(result) => {
					log::error!("delete of {} reported status {}", file_id, result.status);
					std::process::exit(1);
				}
				Err(err) => {
					log::error!("failed to delete {}: {err:?}", file_id);
					std::process::exit(1);
				}
			}
		}
		Some(Command::Heal { file_id }) => match api.heal(file_id).await {
			Ok(result) => {
				log::info!("healed {} chunks for {}", result.healed_chunks, file_id);
			}
			Err(err) => {
				log::error!("failed to heal {}: {err:?}", file_id);
				std::process::exit(1);
			}
		},
		None => {
			if let Err(err) = gui::run(String::from("ChunkBoard"), api) {
				log::error!("gui error: {err:?}");
				std::process::exit(1);
			}
		}
	}
}
