use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::measure::{Measure, TextBox, TextStyle};
use super::tokens::FitContent;
use crate::config::FitConfig;
use crate::error::{BoardError, BoardResult};
use crate::parser::ConditionText;

/// Stage at which fitting stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FitStage {
    /// Fits at the maximum size on one line
    Start,
    ShrinkNoWrap,
    EnableWrap,
    ShrinkWithWrap,
    /// Nothing fit; minimum size, wrapped and clipped
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitResult {
    pub fits: bool,
    pub font_size_px: f64,
    pub wrapped: bool,
}

/// Fit result plus the style the caller should apply to the element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitOutcome {
    pub result: FitResult,
    pub style: TextStyle,
    pub stage: FitStage,
    /// Measurements taken to get here
    pub measurements: usize,
}

/// One text/container pair for batch fitting
#[derive(Debug, Clone, PartialEq)]
pub struct FitRequest {
    pub text: ConditionText,
    pub container_width: f64,
    pub container_height: f64,
}

/// Shrinks and wraps condition text until it fits its arrow
#[derive(Debug, Clone, Default)]
pub struct TextFitter {
    config: FitConfig,
}

impl TextFitter {
    pub fn new(config: FitConfig) -> BoardResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    /// Fit `text` into a `container_width` × `container_height` box.
    ///
    /// Always starts from a reset style, so repeated calls with the same
    /// inputs and a deterministic backend give the same outcome. Failing to
    /// fit is not an error; only an invalid container or a backend returning
    /// a nonsensical box is.
    pub fn fit<M>(
        &self,
        text: &ConditionText,
        measure: &M,
        container_width: f64,
        container_height: f64,
    ) -> BoardResult<FitOutcome>
    where
        M: Measure + ?Sized,
    {
        if !container_width.is_finite()
            || !container_height.is_finite()
            || container_width < 0.0
            || container_height < 0.0
        {
            return Err(BoardError::InvalidContainer {
                width: container_width,
                height: container_height,
            });
        }

        let cfg = &self.config;
        let mut probe = Probe {
            measure,
            content: FitContent::new(text.clone(), cfg.word_scale),
            available: container_width - cfg.buffer(),
            measurements: 0,
        };

        let mut style = TextStyle::single_line(cfg.max_font_size);
        if probe.fits(&style)? {
            return Ok(probe.finish(style, FitStage::Start, true));
        }

        let mut size = cfg.max_font_size;
        while size > cfg.mid_font_size {
            size = (size - cfg.font_step).max(cfg.mid_font_size);
            style.font_size = size;
            if probe.fits(&style)? {
                return Ok(probe.finish(style, FitStage::ShrinkNoWrap, true));
            }
        }

        tracing::debug!(font_size = size, "enabling wrap");
        style.wrap = true;
        style.max_width = Some(probe.available.max(0.0));
        style.max_height = Some(container_height);
        style.clip = true;
        if probe.fits(&style)? {
            return Ok(probe.finish(style, FitStage::EnableWrap, true));
        }

        size = size.min(cfg.mid_font_size);
        while size > cfg.min_font_size {
            size = (size - cfg.font_step).max(cfg.min_font_size);
            style.font_size = size;
            if probe.fits(&style)? {
                return Ok(probe.finish(style, FitStage::ShrinkWithWrap, true));
            }
        }

        style.font_size = cfg.min_font_size;
        Ok(probe.finish(style, FitStage::Exhausted, false))
    }

    /// Fit independent text/container pairs in parallel.
    ///
    /// Each pair runs its own sequential shrink/measure loop; results keep the
    /// order of `requests`.
    pub fn fit_batch<M>(&self, requests: &[FitRequest], measure: &M) -> Vec<BoardResult<FitOutcome>>
    where
        M: Measure + Sync + ?Sized,
    {
        requests
            .par_iter()
            .map(|req| self.fit(&req.text, measure, req.container_width, req.container_height))
            .collect()
    }
}

struct Probe<'a, M: ?Sized> {
    measure: &'a M,
    content: FitContent,
    available: f64,
    measurements: usize,
}

impl<M: Measure + ?Sized> Probe<'_, M> {
    fn fits(&mut self, style: &TextStyle) -> BoardResult<bool> {
        let measured = self.measure.measure(&self.content, style);
        self.measurements += 1;
        let TextBox { width, height } = measured;
        if !measured.is_valid() {
            return Err(BoardError::InvalidMeasurement { width, height });
        }
        tracing::trace!(
            font_size = style.font_size,
            wrap = style.wrap,
            width,
            available = self.available,
            "measured"
        );
        Ok(width <= self.available)
    }

    fn finish(self, style: TextStyle, stage: FitStage, fits: bool) -> FitOutcome {
        tracing::debug!(?stage, fits, font_size = style.font_size, "text fit finished");
        FitOutcome {
            result: FitResult {
                fits,
                font_size_px: style.font_size,
                wrapped: style.wrap,
            },
            style,
            stage,
            measurements: self.measurements,
        }
    }
}
