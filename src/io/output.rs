//! Serialization boundary for metrics snapshots.
//!
//! The reporting layer proper lives outside this crate; what is provided here
//! is a timestamped report wrapper and writers that render it to JSON or a
//! terse text summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::core::metrics::GraphMetrics;
use crate::core::GraphScope;

#[derive(Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

/// A metrics snapshot plus the context it was produced in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    pub scope: GraphScope,
    pub timestamp: DateTime<Utc>,
    pub metrics: GraphMetrics,
}

impl MetricsReport {
    pub fn new(scope: GraphScope, metrics: GraphMetrics) -> Self {
        Self {
            scope,
            timestamp: Utc::now(),
            metrics,
        }
    }
}

pub trait ReportWriter {
    fn write_report(&mut self, report: &MetricsReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &MetricsReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        Ok(())
    }
}

pub struct TextWriter<W: Write> {
    writer: W,
}

impl<W: Write> TextWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for TextWriter<W> {
    fn write_report(&mut self, report: &MetricsReport) -> anyhow::Result<()> {
        let summary = &report.metrics.summary;
        writeln!(self.writer, "Dependency graph ({} scope)", report.scope)?;
        writeln!(
            self.writer,
            "Generated: {}",
            report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(
            self.writer,
            "Nodes: {}  Edges: {}  Density: {:.4}",
            summary.total_nodes, summary.total_edges, summary.density
        )?;
        writeln!(
            self.writer,
            "Components: {} (largest {})  Cycles: {}  Communities: {}",
            summary.component_count,
            summary.largest_component,
            summary.cycle_count,
            summary.community_count
        )?;
        writeln!(
            self.writer,
            "Clustering: {:.4}  Assortativity: {:.4}  Reciprocity: {:.4}",
            summary.global_clustering, summary.assortativity, summary.reciprocity
        )?;
        writeln!(
            self.writer,
            "Diameter: {}  Radius: {}",
            summary.diameter, summary.radius
        )?;
        Ok(())
    }
}

pub fn create_writer<W: Write + 'static>(writer: W, format: OutputFormat) -> Box<dyn ReportWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Text => Box::new(TextWriter::new(writer)),
    }
}
