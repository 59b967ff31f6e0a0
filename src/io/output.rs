use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;
use std::io::Write;

use crate::analysis::{
    AnalysisReport, InvestmentComparisonRow, RiskReturnPoint, ScenarioComparisonRow,
    SensitivityEntry,
};
use crate::core::{Metric, ModelState, RiskFactors, Scenario};
use crate::formatting::{
    format_currency, format_number, format_percentage, format_value, FormattingConfig, Palette,
};
use crate::risk::{describe_metrics, Recommendation, RiskInsights};
use crate::scenario::{ScenarioResult, ScenarioSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "markdown" | "md" => Some(Self::Markdown),
            "terminal" => Some(Self::Terminal),
            _ => None,
        }
    }
}

/// Which report sections to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportView {
    #[default]
    All,
    Scenarios,
    Alternatives,
    Sensitivity,
    Risk,
}

impl ReportView {
    pub fn includes(&self, section: ReportView) -> bool {
        *self == Self::All || *self == section
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub view: ReportView,
    /// Scenario shown in detail and highlighted in comparisons.
    pub selected: Scenario,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            view: ReportView::All,
            selected: Scenario::Realistic,
        }
    }
}

pub trait OutputWriter {
    fn write_report(
        &mut self,
        report: &AnalysisReport,
        state: &ModelState,
        options: &RenderOptions,
    ) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    selected_scenario: Scenario,
    enabled_metrics: Vec<Metric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenarios: Option<&'a ScenarioSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario_comparison: Option<Vec<ScenarioComparisonRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    investment_comparison: Option<Vec<InvestmentComparisonRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sensitivity: Option<&'a [SensitivityEntry]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    risk: Option<JsonRisk<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonRisk<'a> {
    confidence_score: u8,
    insights: &'a RiskInsights,
    recommendation_message: &'static str,
    risk_factors: &'a RiskFactors,
    risk_return: Vec<RiskReturnPoint>,
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(
        &mut self,
        report: &AnalysisReport,
        state: &ModelState,
        options: &RenderOptions,
    ) -> anyhow::Result<()> {
        let view = options.view;
        let json = JsonReport {
            selected_scenario: options.selected,
            enabled_metrics: state.enabled.iter().collect(),
            scenarios: view
                .includes(ReportView::Scenarios)
                .then_some(&report.scenarios),
            scenario_comparison: view
                .includes(ReportView::Scenarios)
                .then(|| report.scenario_comparison()),
            investment_comparison: view
                .includes(ReportView::Alternatives)
                .then(|| report.investment_comparison(state)),
            sensitivity: view
                .includes(ReportView::Sensitivity)
                .then_some(report.sensitivity.as_slice()),
            risk: view.includes(ReportView::Risk).then(|| JsonRisk {
                confidence_score: report.confidence_score,
                insights: &report.insights,
                recommendation_message: report.insights.recommendation.message(),
                risk_factors: &state.risk_factors,
                risk_return: report.risk_return_map(),
            }),
        };

        serde_json::to_writer_pretty(&mut self.writer, &json)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

fn enabled_summary(state: &ModelState) -> String {
    let enabled: Vec<_> = state.enabled.iter().collect();
    if enabled.is_empty() {
        "none".to_string()
    } else {
        describe_metrics(&enabled)
    }
}

/// Current, projected and improvement cells for each enabled metric,
/// followed by revenue.
fn detail_rows(result: &ScenarioResult, state: &ModelState) -> Vec<[String; 4]> {
    state
        .enabled
        .iter()
        .map(|metric| {
            let kind = metric.kind();
            [
                metric.label().to_string(),
                format_value(kind, result.current(metric)),
                format_value(kind, result.projected(metric)),
                format_value(kind, result.improvement(metric)),
            ]
        })
        .chain(std::iter::once([
            "Revenue".to_string(),
            format_currency(result.current.revenue),
            format_currency(result.projected.revenue),
            format_currency(result.improvements.revenue),
        ]))
        .collect()
}

fn months(value: f64) -> String {
    format_number(value, 1)
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(
        &mut self,
        report: &AnalysisReport,
        state: &ModelState,
        options: &RenderOptions,
    ) -> anyhow::Result<()> {
        self.write_header(state, options)?;
        if options.view.includes(ReportView::Scenarios) {
            self.write_scenarios(report, state, options.selected)?;
        }
        if options.view.includes(ReportView::Alternatives) {
            self.write_investments(report, state)?;
        }
        if options.view.includes(ReportView::Sensitivity) {
            self.write_sensitivity(report)?;
        }
        if options.view.includes(ReportView::Risk) {
            self.write_risk(report, state)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, state: &ModelState, options: &RenderOptions) -> anyhow::Result<()> {
        writeln!(self.writer, "# EA Investment ROI Report")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "- Enabled metrics: {}", enabled_summary(state))?;
        writeln!(self.writer, "- EA cost: {}", format_currency(state.inputs.ea_cost))?;
        writeln!(self.writer, "- Selected scenario: {}", options.selected.label())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_row(&mut self, cells: &[&str]) -> anyhow::Result<()> {
        writeln!(self.writer, "| {} |", cells.join(" | "))?;
        Ok(())
    }

    fn write_table_header(&mut self, headers: &[&str]) -> anyhow::Result<()> {
        self.write_row(headers)?;
        let rule: Vec<String> = headers.iter().map(|h| "-".repeat(h.len())).collect();
        writeln!(self.writer, "|{}|", rule.join("|"))?;
        Ok(())
    }

    fn write_scenarios(
        &mut self,
        report: &AnalysisReport,
        state: &ModelState,
        selected: Scenario,
    ) -> anyhow::Result<()> {
        writeln!(self.writer, "## Scenario Comparison")?;
        writeln!(self.writer)?;
        self.write_table_header(&[
            "Scenario",
            "ROI",
            "Annual Benefit",
            "Payback (months)",
            "3-Year NPV",
        ])?;
        for result in report.scenarios.iter() {
            let name = if result.scenario == selected {
                format!("**{}**", result.scenario.label())
            } else {
                result.scenario.label().to_string()
            };
            self.write_row(&[
                &name,
                &format_percentage(result.roi()),
                &format_currency(result.total_annual_benefit),
                &months(result.payback_months()),
                &format_currency(result.projected.net_present_value),
            ])?;
        }
        writeln!(self.writer)?;

        let detail = report.scenarios.get(selected);
        writeln!(self.writer, "### {} Scenario Detail", selected.label())?;
        writeln!(self.writer)?;
        self.write_table_header(&["Metric", "Current", "Projected", "Improvement"])?;
        for row in detail_rows(detail, state) {
            self.write_row(&[&row[0], &row[1], &row[2], &row[3]])?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_investments(&mut self, report: &AnalysisReport, state: &ModelState) -> anyhow::Result<()> {
        writeln!(self.writer, "## Investment Comparison")?;
        writeln!(self.writer)?;
        self.write_table_header(&["Investment", "Cost", "ROI", "Risk", "Payback (months)"])?;
        for row in report.investment_comparison(state) {
            self.write_row(&[
                row.investment,
                &format_currency(row.cost),
                &format_percentage(row.roi),
                row.risk.label(),
                &months(row.payback),
            ])?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_sensitivity(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Sensitivity")?;
        writeln!(self.writer)?;
        let rows = report.sensitivity_rows();
        if rows.is_empty() {
            writeln!(self.writer, "_No enabled metrics to analyze._")?;
            writeln!(self.writer)?;
            return Ok(());
        }
        self.write_table_header(&["Metric", "ROI Impact (pts)"])?;
        for row in rows {
            self.write_row(&[row.metric, &format_number(row.impact, 1)])?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_risk(&mut self, report: &AnalysisReport, state: &ModelState) -> anyhow::Result<()> {
        let insights = &report.insights;
        writeln!(self.writer, "## Risk Assessment")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "- Confidence score: {} ({})",
            insights.confidence_score,
            insights.band.label()
        )?;
        writeln!(
            self.writer,
            "- High-risk metrics: {}",
            describe_metrics(&insights.high_risk)
        )?;
        writeln!(
            self.writer,
            "- Limited evidence: {}",
            describe_metrics(&insights.limited_evidence)
        )?;
        writeln!(
            self.writer,
            "- Recommendation: {}",
            insights.recommendation.message()
        )?;
        writeln!(self.writer)?;

        self.write_table_header(&["Metric", "Probability", "Evidence", "Risk"])?;
        for metric in state.enabled.iter() {
            if let Some(factor) = state.risk_factors.get(metric) {
                self.write_row(&[
                    metric.label(),
                    &format!("{}%", factor.probability),
                    factor.evidence.label(),
                    factor.risk.label(),
                ])?;
            }
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "### Risk vs Return")?;
        writeln!(self.writer)?;
        self.write_table_header(&["Scenario", "Risk", "ROI"])?;
        for point in report.risk_return_map() {
            self.write_row(&[
                point.name,
                &point.risk.to_string(),
                &format_percentage(point.expected_return),
            ])?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
    palette: Palette,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, formatting: FormattingConfig) -> Self {
        Self {
            writer,
            palette: Palette::new(formatting),
        }
    }

    fn table(&self, header: Vec<&str>) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(header);
        if self.palette.is_enabled() {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }
        table
    }
}

fn right(text: impl ToString) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn signed(text: impl ToString, value: f64) -> Cell {
    let color = if value > 0.0 { Color::Green } else { Color::Red };
    right(text).fg(color)
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(
        &mut self,
        report: &AnalysisReport,
        state: &ModelState,
        options: &RenderOptions,
    ) -> anyhow::Result<()> {
        self.print_header(state, options)?;
        if options.view.includes(ReportView::Scenarios) {
            self.print_scenarios(report, state, options.selected)?;
        }
        if options.view.includes(ReportView::Alternatives) {
            self.print_investments(report, state)?;
        }
        if options.view.includes(ReportView::Sensitivity) {
            self.print_sensitivity(report)?;
        }
        if options.view.includes(ReportView::Risk) {
            self.print_risk(report)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn print_header(&mut self, state: &ModelState, options: &RenderOptions) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", self.palette.header("EA Investment ROI Report"))?;
        writeln!(self.writer, "{}", self.palette.header("========================"))?;
        writeln!(
            self.writer,
            "  Enabled metrics: {}",
            self.palette.info(&enabled_summary(state))
        )?;
        writeln!(
            self.writer,
            "  EA cost: {}  |  Selected scenario: {}",
            format_currency(state.inputs.ea_cost),
            options.selected.label()
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_scenarios(
        &mut self,
        report: &AnalysisReport,
        state: &ModelState,
        selected: Scenario,
    ) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", self.palette.header("Scenario Comparison"))?;
        let mut table = self.table(vec![
            "Scenario",
            "ROI",
            "Annual Benefit",
            "Payback (mo)",
            "3-Year NPV",
        ]);
        for result in report.scenarios.iter() {
            let mut name = Cell::new(result.scenario.label());
            if result.scenario == selected {
                name = name.add_attribute(Attribute::Bold);
            }
            table.add_row(vec![
                name,
                signed(format_percentage(result.roi()), result.roi()),
                right(format_currency(result.total_annual_benefit)),
                right(months(result.payback_months())),
                signed(
                    format_currency(result.projected.net_present_value),
                    result.projected.net_present_value,
                ),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;

        writeln!(
            self.writer,
            "{}",
            self.palette
                .header(&format!("{} Scenario Detail", selected.label()))
        )?;
        let mut detail = self.table(vec!["Metric", "Current", "Projected", "Improvement"]);
        for [label, current, projected, improvement] in
            detail_rows(report.scenarios.get(selected), state)
        {
            detail.add_row(vec![
                Cell::new(label),
                right(current),
                right(projected),
                right(improvement),
            ]);
        }
        writeln!(self.writer, "{detail}")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_investments(&mut self, report: &AnalysisReport, state: &ModelState) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", self.palette.header("Investment Comparison"))?;
        let mut table = self.table(vec!["Investment", "Cost", "ROI", "Risk", "Payback (mo)"]);
        for row in report.investment_comparison(state) {
            table.add_row(vec![
                Cell::new(row.investment),
                right(format_currency(row.cost)),
                signed(format_percentage(row.roi), row.roi),
                Cell::new(row.risk.label()),
                right(months(row.payback)),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_sensitivity(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", self.palette.header("Sensitivity"))?;
        let rows = report.sensitivity_rows();
        if rows.is_empty() {
            writeln!(self.writer, "  {}", self.palette.dim("No enabled metrics to analyze."))?;
            writeln!(self.writer)?;
            return Ok(());
        }
        let mut table = self.table(vec!["Metric", "ROI Impact (pts)"]);
        for row in rows {
            table.add_row(vec![Cell::new(row.metric), right(format_number(row.impact, 1))]);
        }
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_risk(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let insights = &report.insights;
        writeln!(self.writer, "{}", self.palette.header("Risk Assessment"))?;
        writeln!(
            self.writer,
            "  Confidence score: {} ({})",
            self.palette.signed(
                &insights.confidence_score.to_string(),
                match insights.recommendation {
                    Recommendation::Proceed => 1.0,
                    Recommendation::PilotFirst => -1.0,
                }
            ),
            insights.band.label()
        )?;
        writeln!(
            self.writer,
            "  High-risk metrics: {}",
            describe_metrics(&insights.high_risk)
        )?;
        writeln!(
            self.writer,
            "  Limited evidence: {}",
            describe_metrics(&insights.limited_evidence)
        )?;
        writeln!(
            self.writer,
            "  Recommendation: {}",
            self.palette.warning(insights.recommendation.message())
        )?;
        writeln!(self.writer)?;

        let mut table = self.table(vec!["Scenario", "Risk", "ROI"]);
        for point in report.risk_return_map() {
            table.add_row(vec![
                Cell::new(point.name),
                right(point.risk),
                signed(format_percentage(point.expected_return), point.expected_return),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        Ok(())
    }
}

pub fn create_writer<'a>(
    format: OutputFormat,
    formatting: FormattingConfig,
    destination: Box<dyn Write + 'a>,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(destination)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(destination)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(destination, formatting)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::core::ModelState;

    fn render(format: OutputFormat, options: RenderOptions) -> String {
        let state = ModelState::default();
        let report = analyze(&state).unwrap();
        let mut buffer = Vec::new();
        {
            let mut writer = create_writer(format, FormattingConfig::plain(), Box::new(&mut buffer));
            writer.write_report(&report, &state, &options).unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    /// Accepts nothing, like a full disk.
    struct FullDevice;

    impl Write for FullDevice {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("no space left on device"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn buffered_write_failure_is_reported() {
        let state = ModelState::default();
        let report = analyze(&state).unwrap();

        for format in [OutputFormat::Json, OutputFormat::Markdown, OutputFormat::Terminal] {
            let destination = Box::new(std::io::BufWriter::new(FullDevice));
            let mut writer = create_writer(format, FormattingConfig::plain(), destination);
            let result = writer.write_report(&report, &state, &RenderOptions::default());
            assert!(result.is_err(), "{format:?} swallowed the write error");
        }
    }

    #[test]
    fn output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("md"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::parse("html"), None);
    }

    #[test]
    fn view_all_includes_every_section() {
        assert!(ReportView::All.includes(ReportView::Risk));
        assert!(ReportView::Risk.includes(ReportView::Risk));
        assert!(!ReportView::Risk.includes(ReportView::Scenarios));
    }

    #[test]
    fn json_omits_unselected_sections() {
        let out = render(
            OutputFormat::Json,
            RenderOptions {
                view: ReportView::Sensitivity,
                selected: Scenario::Realistic,
            },
        );
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value.get("sensitivity").is_some());
        assert!(value.get("scenarios").is_none());
        assert!(value.get("risk").is_none());
        assert_eq!(value["selectedScenario"], "realistic");
    }

    #[test]
    fn json_full_report_has_realistic_roi() {
        let out = render(OutputFormat::Json, RenderOptions::default());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let roi = value["scenarios"]["realistic"]["projected"]["roi"]
            .as_f64()
            .unwrap();
        assert!(roi > 0.0);
        assert!(value["risk"]["riskReturn"][0]["return"].is_number());
    }

    #[test]
    fn markdown_bolds_selected_scenario() {
        let out = render(
            OutputFormat::Markdown,
            RenderOptions {
                view: ReportView::Scenarios,
                selected: Scenario::Optimistic,
            },
        );
        assert!(out.contains("| **Optimistic** |"));
        assert!(out.contains("### Optimistic Scenario Detail"));
        assert!(!out.contains("## Sensitivity"));
    }

    #[test]
    fn markdown_lists_every_investment() {
        let out = render(
            OutputFormat::Markdown,
            RenderOptions {
                view: ReportView::Alternatives,
                selected: Scenario::Realistic,
            },
        );
        assert!(out.contains("| Enterprise Architect | $200,000 |"));
        assert!(out.contains("| Additional Sales Rep | $150,000 | 300.0% | Low | 3.0 |"));
        assert!(out.contains("| Marketing Campaign | $300,000 | 150.0% | High | 6.0 |"));
        assert!(out.contains("| Sales Training | $100,000 | 200.0% | Low | 4.0 |"));
    }

    #[test]
    fn terminal_plain_output_has_no_escape_codes() {
        let out = render(OutputFormat::Terminal, RenderOptions::default());
        assert!(out.contains("EA Investment ROI Report"));
        assert!(out.contains("Enterprise Architect"));
        assert!(!out.contains('\u{1b}'));
    }
}
