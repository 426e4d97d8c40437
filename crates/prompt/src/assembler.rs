//! Strategy-aware prompt assembly.
//!
//! Each [`PromptType`] is a stateless rendering rule over the same inputs:
//!
//! | Strategy  | Minimum window | Worked examples                         |
//! |-----------|----------------|-----------------------------------------|
//! | ZERO_SHOT | 1              | none                                    |
//! | COT       | 1              | none                                    |
//! | FEW_SHOT  | 96             | `[0:24]→[24:48]`, `[48:72]→[72:96]`     |
//! | COT_FEW   | 96             | `[0:24]→[24:48]`, `[48:72]→[72:96]`     |
//!
//! All validation runs before anything is rendered, so a rejected call does
//! no formatting work.

use crate::template::{PromptFields, PromptTemplate};
use serde::Serialize;
use tracing::{debug, info};
use tsprompt_codec::SeriesCodec;
use tsprompt_core::{PromptError, PromptType, TimeseriesPoint, TsFormat, TsType};

/// Points FEW_SHOT and COT_FEW need to carve out their four examples.
pub const FEW_SHOT_MIN_WINDOW: usize = 96;

/// Length of each worked-example sub-window.
pub const EXAMPLE_LEN: usize = 24;

/// Points shown as the start of the expected reply.
pub const START_FORECAST_LEN: usize = 4;

/// Points shown as an example of the reply's shape.
pub const OUTPUT_EXAMPLE_LEN: usize = 24;

const DEFAULT_TIMESTAMP_LABEL: &str = "hour";

// ── Types ─────────────────────────────────────────────────────────────────

/// A rendered prompt and what went into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssembledPrompt {
    pub text: String,
    pub strategy: PromptType,
    pub codec: SeriesCodec,
    pub window_len: usize,
    pub horizon: usize,
    pub fields: PromptFields,
}

/// A prompt paired with the readings it asks the model to predict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastTask {
    pub prompt: AssembledPrompt,
    pub truth: Vec<f64>,
}

/// Builds prompts for one strategy and one format/type pair.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    strategy: PromptType,
    codec: SeriesCodec,
    timestamp_label: String,
    template: PromptTemplate,
}

// ── Assembly ──────────────────────────────────────────────────────────────

impl PromptAssembler {
    pub fn new(strategy: PromptType, format: TsFormat, ty: TsType) -> Self {
        Self {
            strategy,
            codec: SeriesCodec::new(format, ty),
            timestamp_label: DEFAULT_TIMESTAMP_LABEL.to_string(),
            template: PromptTemplate::builtin(strategy),
        }
    }

    /// Unit word used for one step of the series ("hour", "day", ...).
    pub fn with_timestamp_label(mut self, label: impl Into<String>) -> Self {
        self.timestamp_label = label.into();
        self
    }

    /// Replace the built-in template. The template must target the same strategy.
    pub fn with_template(mut self, template: PromptTemplate) -> Result<Self, PromptError> {
        if template.strategy() != self.strategy {
            return Err(PromptError::MalformedTemplate(format!(
                "template is written for {}, assembler uses {}",
                template.strategy(),
                self.strategy
            )));
        }
        self.template = template;
        Ok(self)
    }

    pub fn strategy(&self) -> PromptType {
        self.strategy
    }

    pub fn codec(&self) -> SeriesCodec {
        self.codec
    }

    pub fn timestamp_label(&self) -> &str {
        &self.timestamp_label
    }

    /// Smallest window this assembler accepts.
    pub fn min_window(&self) -> usize {
        if self.strategy.uses_examples() {
            FEW_SHOT_MIN_WINDOW
        } else {
            1
        }
    }

    fn check(&self, window: &[TimeseriesPoint], periods: usize) -> Result<(), PromptError> {
        if periods == 0 {
            return Err(PromptError::InvalidHorizon(0));
        }
        let required = self.min_window();
        if window.len() < required {
            return Err(PromptError::InsufficientWindow {
                strategy: self.strategy,
                required,
                actual: window.len(),
            });
        }
        Ok(())
    }

    fn render_head(&self, window: &[TimeseriesPoint], len: usize) -> String {
        self.codec.format(&window[..len.min(window.len())])
    }

    /// Render the prompt for `window`, asking for `periods` future readings.
    pub fn assemble(
        &self,
        window: &[TimeseriesPoint],
        periods: usize,
    ) -> Result<AssembledPrompt, PromptError> {
        self.check(window, periods)?;

        let examples = self.strategy.uses_examples().then(|| {
            std::array::from_fn(|i| {
                let start = i * EXAMPLE_LEN;
                self.codec.format(&window[start..start + EXAMPLE_LEN])
            })
        });

        let fields = PromptFields {
            periods: window.len(),
            start_forecast: self.render_head(window, START_FORECAST_LEN),
            output: periods,
            output_example: self.render_head(window, OUTPUT_EXAMPLE_LEN),
            data_prompt: self.codec.format(window),
            timestamp: self.timestamp_label.clone(),
            n: periods,
            examples,
        };
        let text = self.template.render(&fields)?;

        debug!(chars = text.len(), "Prompt rendered");
        info!(
            strategy = %self.strategy,
            format = %self.codec.format,
            ty = %self.codec.ty,
            window = window.len(),
            horizon = periods,
            "Assembled prompt"
        );

        Ok(AssembledPrompt {
            text,
            strategy: self.strategy,
            codec: self.codec,
            window_len: window.len(),
            horizon: periods,
            fields,
        })
    }

    /// Assemble a prompt and attach the readings it should predict.
    pub fn task(
        &self,
        window: &[TimeseriesPoint],
        periods: usize,
        truth: Vec<f64>,
    ) -> Result<ForecastTask, PromptError> {
        Ok(ForecastTask {
            prompt: self.assemble(window, periods)?,
            truth,
        })
    }
}

/// Convert a caller-supplied horizon into a usable one.
pub fn validate_horizon(periods: i64) -> Result<usize, PromptError> {
    match usize::try_from(periods) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(PromptError::InvalidHorizon(periods)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsprompt_codec::format_timeseries;

    fn hourly(len: usize) -> Vec<TimeseriesPoint> {
        (0..len)
            .map(|i| {
                TimeseriesPoint::new(
                    format!("2016-07-{:02} {:02}:00:00", i / 24 + 1, i % 24),
                    i as f64 + 0.5,
                )
            })
            .collect()
    }

    #[test]
    fn few_shot_rejects_short_window() {
        let err = PromptAssembler::new(PromptType::FewShot, TsFormat::Csv, TsType::Numeric)
            .assemble(&hourly(50), 24)
            .unwrap_err();
        assert_eq!(
            err,
            PromptError::InsufficientWindow {
                strategy: PromptType::FewShot,
                required: 96,
                actual: 50,
            }
        );
    }

    #[test]
    fn few_shot_fills_four_examples() {
        let window = hourly(96);
        let prompt = PromptAssembler::new(PromptType::FewShot, TsFormat::Csv, TsType::Numeric)
            .assemble(&window, 24)
            .unwrap();

        let examples = prompt.fields.examples.as_ref().unwrap();
        for (i, example) in examples.iter().enumerate() {
            let expected = format_timeseries(
                &window[i * 24..(i + 1) * 24],
                TsFormat::Csv,
                TsType::Numeric,
            );
            assert_eq!(example, &expected, "period{}", i + 1);
            assert!(prompt.text.contains(example.as_str()));
        }
        assert!(examples[0].contains("2016-07-01 00:00:00,0.5"));
        assert!(examples[3].ends_with("2016-07-04 23:00:00,95.5"));
    }

    #[test]
    fn cot_few_shares_the_window_rule() {
        let assembler = PromptAssembler::new(PromptType::CotFew, TsFormat::Json, TsType::Textual);
        assert!(assembler.assemble(&hourly(95), 24).is_err());
        assert!(assembler.assemble(&hourly(120), 24).is_ok());
    }

    #[test]
    fn zero_shot_and_cot_fill_base_fields() {
        let window = hourly(10);
        for strategy in [PromptType::ZeroShot, PromptType::Cot] {
            let prompt = PromptAssembler::new(strategy, TsFormat::Array, TsType::Numeric)
                .assemble(&window, 6)
                .unwrap();
            assert_eq!(prompt.fields.periods, 10);
            assert_eq!(prompt.fields.output, 6);
            assert_eq!(prompt.fields.n, 6);
            assert_eq!(prompt.fields.start_forecast, "[0.5, 1.5, 2.5, 3.5]");
            assert_eq!(prompt.fields.output_example, prompt.fields.data_prompt);
            assert!(prompt.fields.examples.is_none());
            assert!(prompt.text.contains(&prompt.fields.data_prompt));
            assert!(!prompt.text.contains('{'), "{strategy} left a placeholder");
        }
    }

    #[test]
    fn zero_horizon_is_rejected_before_window_checks() {
        let err = PromptAssembler::new(PromptType::FewShot, TsFormat::Csv, TsType::Numeric)
            .assemble(&[], 0)
            .unwrap_err();
        assert_eq!(err, PromptError::InvalidHorizon(0));
    }

    #[test]
    fn empty_window_is_rejected() {
        let err = PromptAssembler::new(PromptType::ZeroShot, TsFormat::Csv, TsType::Numeric)
            .assemble(&[], 4)
            .unwrap_err();
        assert!(matches!(err, PromptError::InsufficientWindow { required: 1, actual: 0, .. }));
    }

    #[test]
    fn horizon_validation() {
        assert_eq!(validate_horizon(24).unwrap(), 24);
        assert_eq!(validate_horizon(0).unwrap_err(), PromptError::InvalidHorizon(0));
        assert_eq!(validate_horizon(-3).unwrap_err(), PromptError::InvalidHorizon(-3));
    }

    #[test]
    fn timestamp_label_is_substituted() {
        let prompt = PromptAssembler::new(PromptType::ZeroShot, TsFormat::Plain, TsType::Numeric)
            .with_timestamp_label("day")
            .assemble(&hourly(3), 2)
            .unwrap();
        assert_eq!(prompt.fields.timestamp, "day");
        assert!(prompt.text.contains("per day"));
    }

    #[test]
    fn custom_template_must_match_strategy() {
        let template = PromptTemplate::custom(PromptType::Cot, "{data_prompt}").unwrap();
        let err = PromptAssembler::new(PromptType::ZeroShot, TsFormat::Csv, TsType::Numeric)
            .with_template(template)
            .unwrap_err();
        assert!(matches!(err, PromptError::MalformedTemplate(_)));
    }

    #[test]
    fn custom_template_renders() {
        let template = PromptTemplate::custom(PromptType::ZeroShot, "{n} after {data_prompt}").unwrap();
        let prompt = PromptAssembler::new(PromptType::ZeroShot, TsFormat::Array, TsType::Numeric)
            .with_template(template)
            .unwrap()
            .assemble(&hourly(2), 3)
            .unwrap();
        assert_eq!(prompt.text, "3 after [0.5, 1.5]");
    }

    #[test]
    fn task_carries_truth() {
        let task = PromptAssembler::new(PromptType::Cot, TsFormat::Tsv, TsType::Numeric)
            .task(&hourly(5), 2, vec![5.5, 6.5])
            .unwrap();
        assert_eq!(task.truth, vec![5.5, 6.5]);
        assert_eq!(task.prompt.horizon, 2);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["prompt"]["strategy"], "COT");
        assert_eq!(json["prompt"]["codec"]["format"], "TSV");
    }
}
