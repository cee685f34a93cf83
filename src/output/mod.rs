pub mod export;
pub mod formatter;

pub use export::{default_export_path, default_filename, write_csv, CSV_HEADER};
pub use formatter::{
    format_banner, format_lead_detail, format_score, format_signals, format_stage_heading,
    format_stage_result, format_tier_summary, format_top_leads, should_use_colors, TierCounts,
    TOP_LEADS,
};
