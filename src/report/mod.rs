pub mod json;
pub mod text;

use std::fmt::Write;

use crate::pipeline::stage3_outcome::CurvePoint;

/// Integral scores print without a fraction; others keep up to four digits.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        return format!("{:.0}", score);
    }
    let mut s = format!("{:.4}", score);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

pub fn format_points(points: f64) -> String {
    if points < 0.0 {
        format_score(points)
    } else {
        format!("+{}", format_score(points))
    }
}

pub fn format_f64_3(v: f64) -> String {
    format!("{:.3}", v)
}

/// One row per curve point; `evaluated` marks the row matching `highlight`.
pub fn render_curve_tsv(points: &[CurvePoint], highlight: Option<f64>) -> String {
    let mut out = String::new();
    out.push_str("score");
    if let Some(first) = points.first() {
        for v in &first.values {
            let _ = write!(out, "\t{} risk_pct\t{} complement_pct", v.label, v.label);
        }
    }
    out.push_str("\tevaluated\n");
    for p in points {
        out.push_str(&format_score(p.score));
        for v in &p.values {
            let _ = write!(
                out,
                "\t{}\t{}",
                format_f64_3(v.risk_pct),
                format_f64_3(v.complement_pct)
            );
        }
        let hit = highlight.is_some_and(|h| h == p.score);
        out.push_str(if hit { "\t1\n" } else { "\t0\n" });
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
