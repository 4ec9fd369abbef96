//! Command-line surface and the mapping from flags to query parameters.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use clap::{Args, Parser, ValueEnum};

use crate::core::params::{CALLBACK, ENDTIME, MINMAGNITUDE, QueryParams, STARTTIME};
use crate::core::types::Format;
use crate::io::config::QuakeConfig;

#[derive(Debug, Parser)]
#[command(
    name = "quakefetch",
    version,
    about = "Query the USGS earthquake catalog"
)]
pub struct Cli {
    /// Run monthly queries over the backfill range, one CSV per month.
    #[arg(long, conflicts_with = "output")]
    pub monthly: bool,

    /// Config file (default: `quakefetch.toml` if present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Catalog query endpoint.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Directory for generated artifacts.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output file path (default: auto-generated).
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub filters: QueryFilters,
}

impl Cli {
    /// Apply `--base-url` / `--output-dir` on top of the loaded config.
    pub fn apply_overrides(&self, cfg: &mut QuakeConfig) -> Result<()> {
        if let Some(base_url) = &self.base_url {
            cfg.base_url = base_url.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            cfg.output_dir = output_dir.clone();
        }
        cfg.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IncludeDeleted {
    True,
    Only,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderBy {
    Time,
    TimeAsc,
    Magnitude,
    MagnitudeAsc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlertLevel {
    Green,
    Yellow,
    Orange,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KmlColorBy {
    Age,
    Depth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReviewStatus {
    Automatic,
    Reviewed,
}

/// Catalog filters. Flag names follow the API's parameter names.
#[derive(Debug, Clone, Default, Args)]
pub struct QueryFilters {
    /// Output format (forced to csv with --monthly).
    #[arg(long, value_enum, default_value_t = Format::Geojson)]
    pub format: Format,

    /// Start time (ISO 8601).
    #[arg(long)]
    pub starttime: Option<String>,
    /// End time (ISO 8601).
    #[arg(long)]
    pub endtime: Option<String>,
    /// Only events updated after this time (ISO 8601).
    #[arg(long)]
    pub updatedafter: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub minlatitude: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub maxlatitude: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub minlongitude: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub maxlongitude: Option<f64>,

    /// Circle center latitude.
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: Option<f64>,
    /// Circle center longitude.
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: Option<f64>,
    /// Circle radius in degrees.
    #[arg(long)]
    pub maxradius: Option<f64>,
    /// Circle radius in kilometers (ignored when --maxradius is set).
    #[arg(long)]
    pub maxradiuskm: Option<f64>,

    #[arg(long)]
    pub catalog: Option<String>,
    #[arg(long)]
    pub contributor: Option<String>,
    #[arg(long)]
    pub eventid: Option<String>,
    #[arg(long)]
    pub includeallmagnitudes: bool,
    #[arg(long)]
    pub includeallorigins: bool,
    #[arg(long)]
    pub includearrivals: bool,
    #[arg(long, value_enum)]
    pub includedeleted: Option<IncludeDeleted>,
    #[arg(long)]
    pub includesuperseded: bool,
    /// Maximum number of events returned.
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long, allow_negative_numbers = true)]
    pub maxdepth: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub maxmagnitude: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub mindepth: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub minmagnitude: Option<f64>,
    #[arg(long)]
    pub offset: Option<u32>,
    /// Result ordering (default for one-shot queries: time).
    #[arg(long, value_enum)]
    pub orderby: Option<OrderBy>,

    #[arg(long, value_enum)]
    pub alertlevel: Option<AlertLevel>,
    /// JSONP callback.
    #[arg(long)]
    pub callback: Option<String>,
    #[arg(long)]
    pub eventtype: Option<String>,
    #[arg(long)]
    pub jsonerror: bool,
    #[arg(long)]
    pub kmlanimated: bool,
    #[arg(long, value_enum)]
    pub kmlcolorby: Option<KmlColorBy>,
    #[arg(long)]
    pub maxcdi: Option<f64>,
    #[arg(long)]
    pub maxgap: Option<f64>,
    #[arg(long)]
    pub maxmmi: Option<f64>,
    #[arg(long)]
    pub maxsig: Option<i64>,
    #[arg(long)]
    pub mincdi: Option<f64>,
    #[arg(long)]
    pub minfelt: Option<i64>,
    #[arg(long)]
    pub mingap: Option<f64>,
    #[arg(long)]
    pub minsig: Option<i64>,
    /// Status returned when nothing matches.
    #[arg(long, value_parser = ["204", "404"])]
    pub nodata: Option<String>,
    #[arg(long)]
    pub producttype: Option<String>,
    #[arg(long)]
    pub productcode: Option<String>,
    #[arg(long, value_enum)]
    pub reviewstatus: Option<ReviewStatus>,
}

impl QueryFilters {
    /// Parameters for a one-shot query: every given filter, time bounds as
    /// typed, and `orderby=time` unless overridden.
    pub fn to_query_params(&self) -> QueryParams {
        let mut params = QueryParams::new(self.format);
        params.set_opt(STARTTIME, self.starttime.as_deref());
        params.set_opt(ENDTIME, self.endtime.as_deref());
        self.apply_filters(&mut params);
        params.set("orderby", wire(&self.orderby.unwrap_or(OrderBy::Time)));
        self.apply_extensions(&mut params);
        params
    }

    /// Extra parameters for a backfill. Time bounds and format are owned by
    /// the backfill itself; `orderby` is only sent when given explicitly.
    pub fn to_backfill_params(&self) -> QueryParams {
        let mut params = QueryParams::new(Format::Csv);
        self.apply_filters(&mut params);
        params.set_opt("orderby", self.orderby.as_ref().map(wire));
        self.apply_extensions(&mut params);
        params
    }

    fn apply_filters(&self, params: &mut QueryParams) {
        params.set_opt("updatedafter", self.updatedafter.as_deref());

        params.set_opt("minlatitude", self.minlatitude);
        params.set_opt("maxlatitude", self.maxlatitude);
        params.set_opt("minlongitude", self.minlongitude);
        params.set_opt("maxlongitude", self.maxlongitude);

        if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            let radius = match (self.maxradius, self.maxradiuskm) {
                (Some(degrees), _) => Some(("maxradius", degrees)),
                (None, Some(km)) => Some(("maxradiuskm", km)),
                (None, None) => None,
            };
            if let Some((name, value)) = radius {
                params.set("latitude", latitude);
                params.set("longitude", longitude);
                params.set(name, value);
            }
        }

        params.set_opt("catalog", self.catalog.as_deref());
        params.set_opt("contributor", self.contributor.as_deref());
        params.set_opt("eventid", self.eventid.as_deref());
        set_flag(params, "includeallmagnitudes", self.includeallmagnitudes);
        set_flag(params, "includeallorigins", self.includeallorigins);
        set_flag(params, "includearrivals", self.includearrivals);
        params.set_opt("includedeleted", self.includedeleted.as_ref().map(wire));
        set_flag(params, "includesuperseded", self.includesuperseded);
        params.set_opt("limit", self.limit.filter(|limit| *limit > 0));
        params.set_opt("maxdepth", self.maxdepth);
        params.set_opt("maxmagnitude", self.maxmagnitude);
        params.set_opt("mindepth", self.mindepth);
        params.set_opt(MINMAGNITUDE, self.minmagnitude);
        params.set_opt("offset", self.offset.filter(|offset| *offset > 0));
    }

    fn apply_extensions(&self, params: &mut QueryParams) {
        params.set_opt("alertlevel", self.alertlevel.as_ref().map(wire));
        params.set_opt(CALLBACK, self.callback.as_deref());
        params.set_opt("eventtype", self.eventtype.as_deref());
        set_flag(params, "jsonerror", self.jsonerror);
        set_flag(params, "kmlanimated", self.kmlanimated);
        params.set_opt("kmlcolorby", self.kmlcolorby.as_ref().map(wire));
        params.set_opt("maxcdi", self.maxcdi);
        params.set_opt("maxgap", self.maxgap);
        params.set_opt("maxmmi", self.maxmmi);
        params.set_opt("maxsig", self.maxsig);
        params.set_opt("mincdi", self.mincdi);
        params.set_opt("minfelt", self.minfelt);
        params.set_opt("mingap", self.mingap);
        params.set_opt("minsig", self.minsig);
        params.set_opt("nodata", self.nodata.as_deref());
        params.set_opt("producttype", self.producttype.as_deref());
        params.set_opt("productcode", self.productcode.as_deref());
        params.set_opt("reviewstatus", self.reviewstatus.as_ref().map(wire));
    }
}

fn set_flag(params: &mut QueryParams, name: &str, enabled: bool) {
    if enabled {
        params.set(name, "true");
    }
}

fn wire<T: ValueEnum>(value: &T) -> String {
    value
        .to_possible_value()
        .map(|possible| possible.get_name().to_string())
        .unwrap_or_default()
}

/// Parse a backfill bound: `YYYY-MM-DD`, or an ISO 8601 date-time truncated to
/// its calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(datetime.date());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Ok(datetime.date());
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.date_naive());
    }
    Err(anyhow!("invalid date {value:?} (expected YYYY-MM-DD or ISO 8601)"))
}
