use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::Config;
use crate::error::{AoaError, Result};
use crate::generator::catalog::SectionCatalog;
use crate::generator::context::{FillOptions, GeneratorContext};
use crate::generator::outlet::{DiskOutlet, Outlet};
use crate::generator::preprocess::{self, RunInputs};
use crate::generator::progress::ProgressReporter;
use crate::generator::prompt::PromptComposer;
use crate::generator::template::{Template, apply_literals};
use crate::llm::TextGenerator;
use crate::types::ProjectData;

/// 单次运行的阶段：LOADING → RENDERING_LITERALS → GENERATING(i)... → WRITING → DONE
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunPhase {
    Loading,
    RenderingLiterals,
    Generating { index: usize, section_id: String },
    Writing,
    Done,
}

impl Display for RunPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RunPhase::Loading => write!(f, "loading"),
            RunPhase::RenderingLiterals => write!(f, "rendering_literals"),
            RunPhase::Generating { index, section_id } => {
                write!(f, "generating[{}]:{}", index, section_id)
            }
            RunPhase::Writing => write!(f, "writing"),
            RunPhase::Done => write!(f, "done"),
        }
    }
}

/// 时间跟踪作用域
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: HashMap<String, Instant>,
    phase_durations: Vec<(String, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: HashMap::new(),
            phase_durations: Vec::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase: &RunPhase) {
        debug!(phase = %phase, "entering phase");
        self.phase_start_times.insert(phase.to_string(), Instant::now());
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, phase: &RunPhase) -> Option<Duration> {
        let key = phase.to_string();
        let start_time = self.phase_start_times.remove(&key)?;
        let duration = start_time.elapsed();
        self.phase_durations.push((key, duration));
        Some(duration)
    }

    pub fn total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 已结束阶段的耗时，按结束顺序排列
    pub fn phase_durations(&self) -> &[(String, Duration)] {
        &self.phase_durations
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!("total: {:.2}s", self.total_duration().as_secs_f64());
        for (phase, duration) in &self.phase_durations {
            report.push_str(&format!("; {}: {:.3}s", phase, duration.as_secs_f64()));
        }
        report
    }
}

/// 启动报告生成：加载输入、创建 provider 客户端、逐章节生成并写出报告
pub async fn launch(config: &Config) -> Result<PathBuf> {
    let mut timing = TimingScope::new();

    timing.start_phase(&RunPhase::Loading);
    let inputs = preprocess::execute(config).await?;
    let context = GeneratorContext::new(config.clone())?;
    debug!(provider = %context.llm_client.describe(), "provider client ready");
    timing.end_phase(&RunPhase::Loading);

    run(&context, inputs, timing).await
}

/// 使用上下文中已给定的生成器运行完整流程
pub async fn launch_with(context: &GeneratorContext) -> Result<PathBuf> {
    let mut timing = TimingScope::new();

    timing.start_phase(&RunPhase::Loading);
    let inputs = preprocess::execute(&context.config).await?;
    timing.end_phase(&RunPhase::Loading);

    run(context, inputs, timing).await
}

async fn run(
    context: &GeneratorContext,
    inputs: RunInputs,
    mut timing: TimingScope,
) -> Result<PathBuf> {
    let catalog = inputs.catalog.build(&inputs.data);

    let report = fill_template_timed(
        &inputs.template_source,
        &inputs.data,
        &catalog,
        context.llm_client.as_ref(),
        context.progress.as_ref(),
        &context.fill_options(),
        &mut timing,
    )
    .await?;

    timing.start_phase(&RunPhase::Writing);
    let outlet = DiskOutlet::new(context.config.output_file());
    let path = outlet.save(&report).await?;
    timing.end_phase(&RunPhase::Writing);

    context.progress.report_written(&path);
    debug!(phase = %RunPhase::Done, timing = %timing.generate_timing_report(), "run finished");

    Ok(path)
}

/// 用章节目录填充模板
///
/// 先替换字面字段，再按目录顺序逐个章节组装 prompt、调用生成器并填充对应占位符。
/// 任一章节生成失败立即返回错误，不产生部分结果。
pub async fn fill_template(
    template_source: &str,
    data: &ProjectData,
    catalog: &SectionCatalog,
    generator: &dyn TextGenerator,
    progress: &dyn ProgressReporter,
    options: &FillOptions,
) -> Result<String> {
    let mut timing = TimingScope::new();
    fill_template_timed(
        template_source,
        data,
        catalog,
        generator,
        progress,
        options,
        &mut timing,
    )
    .await
}

#[allow(clippy::too_many_arguments)]
async fn fill_template_timed(
    template_source: &str,
    data: &ProjectData,
    catalog: &SectionCatalog,
    generator: &dyn TextGenerator,
    progress: &dyn ProgressReporter,
    options: &FillOptions,
    timing: &mut TimingScope,
) -> Result<String> {
    let mut template = Template::parse(template_source);

    timing.start_phase(&RunPhase::RenderingLiterals);
    let literals = apply_literals(&mut template, data, &options.literal_fields);
    timing.end_phase(&RunPhase::RenderingLiterals);
    debug!(literals, "literal fields rendered");

    let composer = PromptComposer::new(data);
    for (index, section) in catalog.sections().iter().enumerate() {
        if options.skip_unused_sections && !template.contains_placeholder(&section.id) {
            debug!(section = %section.id, "placeholder not in template, skipping");
            continue;
        }

        let phase = RunPhase::Generating {
            index,
            section_id: section.id.clone(),
        };
        timing.start_phase(&phase);

        let prompt = composer.compose(section);
        progress.section_started(&section.id);
        let generated = generator
            .generate(&prompt, options.max_tokens)
            .await
            .map_err(|e| with_section(e, &section.id))?;
        let replaced = template.fill(&section.id, generated.trim());

        let elapsed = timing.end_phase(&phase).unwrap_or_default();
        debug!(
            section = %section.id,
            replaced,
            chars = generated.trim().chars().count(),
            elapsed_ms = elapsed.as_millis() as u64,
            "section generated"
        );
    }

    Ok(template.render())
}

fn with_section(error: AoaError, section_id: &str) -> AoaError {
    match error {
        AoaError::Provider { provider, message } => AoaError::Provider {
            provider,
            message: format!("section '{}': {}", section_id, message),
        },
        other => other,
    }
}
