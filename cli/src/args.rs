use clap::Parser;
#[derive(Debug, Parser)]
#[clap(name = "chunkboard")]
pub struct Args {
	/// Base URL of the master coordination service
	#[clap(long, default_value = "http://127.0.0.1:8000")]
	pub master: String,
	#[clap(subcommand)]
	pub command: Option<Command>,
}

#[derive(Debug, Parser)]
pub enum Command {
	/// List files stored on the cluster
	Files,
	/// Show storage node liveness
	Nodes,
	Upload {
		path: String,
	},
	Download {
		file_id: String,
	},
	Delete {
		file_id: String,
		/// Skip the confirmation guard
		#[clap(long)]
		yes: bool,
	},
	Heal {
		file_id: String,
	},
}
