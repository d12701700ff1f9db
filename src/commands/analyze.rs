use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use ipolens::collaborators::{
    FileTextExtractor, FixedResolver, HttpFetcher, NewsApiClient, ScreenerClient,
    StaticMarketData, YahooSearchResolver,
};
use ipolens::config::Config;
use ipolens::error::{Error, IpoLensErrorTrait};
use ipolens::pipeline::{PipelineOutcome, ProfitabilityPipeline};
use ipolens::report::{ReportFormat, ReportWriter};

/// Arguments of the `analyze` command
#[derive(Debug)]
pub struct AnalyzeParams {
    pub document: PathBuf,
    pub name: String,
    pub ticker: Option<String>,
    pub output: Option<PathBuf>,
    pub format: Option<String>,
    pub no_news: bool,
    pub no_market: bool,
    pub metrics: bool,
}

/// Run the pipeline and write a report
///
/// Returns `Ok(false)` when the analysis was aborted; the reason has
/// already been printed.
pub async fn analyze(mut config: Config, params: AnalyzeParams) -> Result<bool> {
    if let Some(output) = params.output {
        config.report.output_dir = output;
    }
    if let Some(format) = params.format {
        config.report.format = format;
    }
    if params.no_news {
        config.news.enabled = false;
    }
    if params.no_market {
        config.market.resolve_ticker = false;
        config.market.use_screener = false;
        config.market.competitors.clear();
    }
    config.validate()?;

    let format: ReportFormat = config.report.format.parse()?;
    let pipeline = build_pipeline(&config, params.ticker.as_deref())?;

    println!("Analyzing IPO: {}", params.name);
    println!("================================");

    let completed = match pipeline.run(&params.document, &params.name).await {
        PipelineOutcome::Done(result) => {
            let renderer = format.renderer()?;
            let path = ReportWriter::from_config(&config.report)
                .write(&result, renderer.as_ref())
                .context("Failed to write report")?;

            for row in result.impact_table.iter() {
                println!("  {:<12} count {:>4}  impact {:>8.2}", row.term, row.count, row.impact);
            }
            println!();
            println!("Sentiment:   {}", result.sentiment);
            println!("Mean impact: {:.2}", result.mean_impact);
            println!("Conclusion:  {}", result.conclusion.summary());

            for degraded in &result.degradations {
                println!("Warning: {degraded}");
            }

            println!("\nReport saved to {}", path.display());
            true
        }

        PipelineOutcome::Aborted { stage, error, .. } => {
            eprintln!("Analysis aborted during {stage} ({}): {error}", error.category());
            match error {
                Error::Resolution { .. } => eprintln!(
                    "No identifier is available for \"{}\". Pass --ticker to supply one, \
                     or --no-market to skip market data.",
                    params.name
                ),
                Error::Extraction(_) => eprintln!(
                    "Provide the prospectus as plain text or HTML: {}",
                    params.document.display()
                ),
                _ => {}
            }
            false
        }
    };

    if params.metrics {
        write_metrics(&mut std::io::stderr().lock())?;
    }

    Ok(completed)
}

/// Write the Prometheus text exposition of this process's metrics
fn write_metrics<W: Write>(out: &mut W) -> Result<()> {
    let text = ipolens::metrics::gather_metrics()
        .map_err(|e| anyhow::anyhow!("Failed to gather metrics: {e}"))?;
    out.write_all(text.as_bytes())?;
    Ok(())
}

fn build_pipeline(config: &Config, ticker: Option<&str>) -> Result<ProfitabilityPipeline> {
    let fetcher = Arc::new(HttpFetcher::from_config(&config.http)?);

    let mut builder = ProfitabilityPipeline::builder(Arc::new(FileTextExtractor::new()))
        .vocabulary(config.analysis.vocabulary.clone());

    if let Some(ticker) = ticker {
        builder = builder.resolver(Arc::new(FixedResolver::new(ticker)));
    } else if config.market.resolve_ticker {
        builder = builder.resolver(Arc::new(YahooSearchResolver::new(
            Arc::clone(&fetcher),
            config.market.search_url.clone(),
        )));
    }

    if config.news.enabled {
        if config.news.api_key.is_none() {
            tracing::warn!("No news API key configured; sentiment will fall back to neutral");
        }
        builder = builder.sentiment_source(Arc::new(NewsApiClient::new(
            Arc::clone(&fetcher),
            config.news.base_url.clone(),
            config.news.api_key.clone(),
        )));
    }

    if !config.market.competitors.is_empty() {
        builder = builder.market_source(Arc::new(StaticMarketData::new(
            config.market.competitors.clone(),
        )));
    } else if config.market.use_screener {
        builder = builder.market_source(Arc::new(ScreenerClient::new(
            fetcher,
            config.market.screener_url.clone(),
        )));
    }

    Ok(builder.build()?)
}
