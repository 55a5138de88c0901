//! Console report rendering
//!
//! Plain-text output for the CLI subcommands. Everything here is a pure
//! function of already-computed results so the wording can be tested.
//!
//! Created: 2026-10-17

use crate::migration::DetectionEvent;
use crate::pool::ImpactSummary;
use crate::tax::ShadowTaxAudit;
use crate::types::ProtocolParams;
use std::fmt::Write;

/// Fixed marker printed ahead of every detection
pub const DETECTION_MARKER: &str = "[!] GRADUATION DETECTED";

const RULE: &str = "------------------------------------";

/// Narrative sentence for one summary
pub fn narrative(summary: &ImpactSummary, params: &ProtocolParams) -> String {
    format!(
        "The token is {:.1}% more volatile due to the protocol's {} SOL extraction.",
        summary.volatility_increase_pct(),
        params.virtual_advance
    )
}

/// Four-field liquidity compression report
pub fn render_impact_report(summary: &ImpactSummary, params: &ProtocolParams) -> String {
    let mut out = String::new();
    let size = summary.sol_in;
    // Writing to a String cannot fail
    let _ = writeln!(out, "--- LIQUIDITY COMPRESSION REPORT ---");
    let _ = writeln!(out, "Pre-Migration Slippage ({} SOL):  {:.4}%", size, summary.pre_impact_pct);
    let _ = writeln!(out, "Post-Migration Slippage ({} SOL): {:.4}%", size, summary.post_impact_pct);
    let _ = writeln!(out, "Volatility Escalation:           {:.2}x", summary.escalation_ratio);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "CONCLUSION: {}", narrative(summary, params));
    out
}

/// One row per trade size
pub fn render_matrix(rows: &[ImpactSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>10}  {:>12}  {:>12}  {:>10}  {:>10}",
        "SOL in", "pre %", "post %", "escalation", "volatility"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:>10}  {:>11.4}%  {:>11.4}%  {:>9.2}x  {:>9.1}%",
            row.sol_in,
            row.pre_impact_pct,
            row.post_impact_pct,
            row.escalation_ratio,
            row.volatility_increase_pct()
        );
    }
    out
}

pub fn render_audit(audit: &ShadowTaxAudit) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- SHADOW TAX AUDIT ---");
    let _ = writeln!(out, "Total Volume Analyzed: {} SOL", audit.volume);
    let _ = writeln!(out, "Fees Paid by Traders: {:.4} SOL", audit.fees_collected);
    let _ = writeln!(out, "Creator Rebate: {:.4} SOL", audit.creator_rebate);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Protocol Retention: {:.4} SOL", audit.protocol_retention);
    let _ = writeln!(out, "Protocol Net Extraction: {:.4} SOL", audit.total_extraction);
    let _ = writeln!(
        out,
        "Extraction Ratio: {:.2}x ({:.2} SOL taken for every 1 SOL rebated)",
        audit.extraction_ratio.round_dp(2),
        audit.extraction_ratio.round_dp(2)
    );
    let _ = writeln!(
        out,
        "Liquidity Compression Tax: {:.2}% of capital raised",
        audit.compression_tax_pct.round_dp(2)
    );
    let _ = writeln!(out, "Liquidity Density Drop: {:.2}%", audit.density_drop_pct.round_dp(2));
    out
}

/// Console block for one detection: marker, signature, explorer reference
pub fn detection_line(event: &DetectionEvent, params: &ProtocolParams) -> String {
    format!(
        "{}\nSignature: {}\nTransaction: {}\nStatus: {} SOL virtual advance reclaimed by protocol.",
        DETECTION_MARKER,
        event.signature,
        params.tx_url(&event.signature),
        params.virtual_advance
    )
}
