use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = regwise_api::Args::parse();

	regwise_api::run(args).await
}
