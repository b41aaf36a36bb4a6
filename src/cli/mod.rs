//! Command-line interface

mod report;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::services::{
    breakdown, Aggregator, InsightsService, MockFeed, RecordFeed, Settings, SourceFilter,
    ThemePreference,
};
use crate::types::{AggregationLevel, CampaignRecord, DateRange};

/// Campaign lead & cost performance dashboard
#[derive(Parser)]
#[command(name = "leadtrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Date range and channel selection shared by the report commands
#[derive(Args)]
struct RangeArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End date (YYYY-MM-DD), inclusive
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Shortcut: the last N days ending today
    #[arg(long, default_value_t = 30, conflicts_with_all = ["from", "to"])]
    last: i64,

    /// Restrict to a single channel (e.g. facebook)
    #[arg(long)]
    source: Option<String>,
}

impl RangeArgs {
    fn range(&self, today: NaiveDate) -> anyhow::Result<DateRange> {
        let range = match (self.from, self.to) {
            (Some(from), Some(to)) => DateRange::new(from, to),
            (Some(from), None) => DateRange::new(from, today),
            (None, Some(to)) => DateRange::last_days(to, self.last),
            (None, None) => DateRange::last_days(today, self.last.max(1)),
        };
        anyhow::ensure!(
            range.start <= range.end,
            "start date {} is after end date {}",
            range.start,
            range.end
        );
        Ok(range)
    }

    fn filter(&self) -> SourceFilter {
        match &self.source {
            Some(source) => SourceFilter::only(source),
            None => SourceFilter::All,
        }
    }

    /// Fetch and filter records for the selected range
    fn load(&self, today: NaiveDate) -> anyhow::Result<(DateRange, Vec<CampaignRecord>)> {
        let range = self.range(today)?;
        let records = MockFeed::new()
            .fetch(&range)
            .context("failed to load campaign data")?;
        Ok((range, self.filter().apply(&records)))
    }
}

/// Aggregation level argument
#[derive(Clone, Copy, ValueEnum)]
enum LevelArg {
    Daily,
    Weekly,
    Monthly,
}

impl From<LevelArg> for AggregationLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Daily => Self::Daily,
            LevelArg::Weekly => Self::Weekly,
            LevelArg::Monthly => Self::Monthly,
        }
    }
}

/// Breakdown dimension argument
#[derive(Clone, Copy, ValueEnum)]
enum DimensionArg {
    Source,
    Placement,
    Campaign,
}

/// Theme preference argument
#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Auto,
    Dark,
    Light,
}

impl From<ThemeArg> for ThemePreference {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Auto => Self::Auto,
            ThemeArg::Dark => Self::Dark,
            ThemeArg::Light => Self::Light,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive dashboard (default)
    Tui,

    /// Show summary metrics for the period
    Summary {
        #[command(flatten)]
        range: RangeArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the bucketed timeline
    Timeline {
        #[command(flatten)]
        range: RangeArgs,

        /// Bucketing level (defaults by range span)
        #[arg(long, value_enum)]
        level: Option<LevelArg>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a categorical breakdown
    Breakdown {
        #[command(flatten)]
        range: RangeArgs,

        /// Dimension to break down by
        #[arg(long, value_enum, default_value_t = DimensionArg::Source)]
        by: DimensionArg,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate an AI narrative for the period
    Insights {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Show or update persisted settings
    Config {
        /// Theme preference
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,

        /// Gemini API key for AI analysis
        #[arg(long)]
        api_key: Option<String>,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let today = Local::now().date_naive();

        match self.command {
            None | Some(Commands::Tui) => crate::tui::run(),
            Some(Commands::Summary { range, json }) => {
                let (date_range, records) = range.load(today)?;
                let metrics = Aggregator::summarize(&records, today);
                if json {
                    println!("{}", report::summary_json(&metrics));
                } else {
                    print!("{}", report::summary_text(&metrics, &date_range));
                }
                Ok(())
            }
            Some(Commands::Timeline { range, level, json }) => {
                let (date_range, records) = range.load(today)?;
                let level = level.map(AggregationLevel::from).unwrap_or_else(|| {
                    AggregationLevel::for_span_days(date_range.span_days())
                });
                let buckets = Aggregator::bucketize(&records, level);
                if json {
                    println!("{}", report::timeline_json(&buckets));
                } else {
                    print!("{}", report::timeline_text(&buckets, level));
                }
                Ok(())
            }
            Some(Commands::Breakdown { range, by, json }) => {
                let (_, records) = range.load(today)?;
                let (slices, title) = match by {
                    DimensionArg::Source => (breakdown::by_source(&records), "Contact Sources"),
                    DimensionArg::Placement => {
                        (breakdown::by_placement(&records), "Contacts by Placement")
                    }
                    DimensionArg::Campaign => (
                        breakdown::qualified_by_campaign(&records),
                        "Qualified by Campaign",
                    ),
                };
                if json {
                    println!("{}", report::breakdown_json(&slices));
                } else {
                    print!("{}", report::breakdown_text(&slices, title));
                }
                Ok(())
            }
            Some(Commands::Insights { range }) => {
                let (date_range, records) = range.load(today)?;
                let metrics = Aggregator::summarize(&records, today);
                let api_key = Settings::load().resolve_api_key().unwrap_or_default();
                let narrative = InsightsService::new(&api_key)?
                    .generate(&records, &metrics, &date_range)?;
                println!("{}", narrative);
                Ok(())
            }
            Some(Commands::Config { theme, api_key }) => {
                let mut settings = Settings::load();
                let changed = theme.is_some() || api_key.is_some();

                if let Some(theme) = theme {
                    settings.theme = theme.into();
                }
                if let Some(api_key) = api_key {
                    settings.api_key = Some(api_key);
                }
                if changed {
                    settings.save()?;
                    println!("Settings saved.");
                }

                println!("theme: {:?}", settings.theme);
                println!(
                    "api_key: {}",
                    if settings.resolve_api_key().is_some() {
                        "configured"
                    } else {
                        "not set"
                    }
                );
                Ok(())
            }
        }
    }
}
