use anyhow::{Context, Result};
use gleaner::{Config, SourceDocument};
use reqwest::header::HeaderMap;
use url::Url;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(path), Some(source)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: gleaner <file.html> <source-url>");
    };

    let html = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let url = Url::parse(&source).with_context(|| format!("parsing source url {source}"))?;
    let document = SourceDocument::new(url, HeaderMap::new(), html);

    let articles = gleaner::articles(&document, &Config::default()).await?;
    println!("{}", serde_json::to_string_pretty(&articles)?);
    Ok(())
}
