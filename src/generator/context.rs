use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::generator::progress::{ConsolePrinter, ProgressReporter};
use crate::llm::{LLMClient, TextGenerator};

#[derive(Clone)]
pub struct GeneratorContext {
    /// LLM调用器，用于与AI通信。
    pub llm_client: Arc<dyn TextGenerator>,
    /// 配置
    pub config: Config,
    /// 进度输出
    pub progress: Arc<dyn ProgressReporter>,
}

impl GeneratorContext {
    /// 按配置创建真实的 provider 客户端，进度打印到标准输出
    pub fn new(config: Config) -> Result<Self> {
        let llm_client = LLMClient::new(&config.llm)?;
        Ok(Self {
            llm_client: Arc::new(llm_client),
            config,
            progress: Arc::new(ConsolePrinter),
        })
    }

    pub fn with_generator(
        config: Config,
        llm_client: Arc<dyn TextGenerator>,
        progress: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            llm_client,
            config,
            progress,
        }
    }

    /// 本次运行的模板填充参数
    pub fn fill_options(&self) -> FillOptions {
        FillOptions {
            max_tokens: self.config.llm.max_tokens,
            literal_fields: self.config.literal_fields.clone(),
            skip_unused_sections: self.config.skip_unused_sections,
        }
    }
}

/// 模板填充参数
#[derive(Debug, Clone)]
pub struct FillOptions {
    pub max_tokens: u32,
    pub literal_fields: Vec<String>,
    pub skip_unused_sections: bool,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            max_tokens: crate::llm::DEFAULT_MAX_TOKENS,
            literal_fields: vec!["project_name".to_string()],
            skip_unused_sections: false,
        }
    }
}
