//! Leadbox management entry point.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	leadbox::cli::execute_from_command_line().await
}
