//! 控制台界面 - 编排层
//!
//! 最薄的一层展示：读取命令 → 调用协调器 → 按协调器暴露的状态输出。
//! 不做任何业务判断。

use anyhow::{Context, Result};
use reqwest::Url;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::config::Config;
use crate::infrastructure::{report_url, ConsultantBackend, HttpBackend};
use crate::models::{
    ConsultationRequest, ConsultationResponse, Industry, Role, SpecsUpload, SystemType,
};
use crate::orchestrator::command::{parse_command, Command, HELP_TEXT};
use crate::workflow::operation::failure_message;
use crate::workflow::{
    AdminApprovalCoordinator, ConsultationCoordinator, DeepDiveCoordinator,
    RegistrationCoordinator,
};

/// 表单里的下拉框取值
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormSelections {
    pub industry: Industry,
    pub role: Role,
    pub system_type: SystemType,
}

/// 应用主结构
pub struct App {
    base_url: Url,
    form: FormSelections,
    consultation: ConsultationCoordinator,
    deep_dive: DeepDiveCoordinator,
    admin: AdminApprovalCoordinator,
    registration: RegistrationCoordinator,
}

impl App {
    /// 初始化应用：构建 HTTP 后端，拉取一次规格文件列表
    pub async fn initialize(config: Config) -> Result<Self> {
        let http = HttpBackend::new(&config).context("无法创建后端客户端")?;
        let base_url = http.base_url().clone();
        Ok(Self::with_backend(base_url, Arc::new(http)).await)
    }

    /// 使用指定后端初始化
    pub async fn with_backend(base_url: Url, backend: Arc<dyn ConsultantBackend>) -> Self {
        Self {
            base_url,
            form: FormSelections::default(),
            consultation: ConsultationCoordinator::new(backend.clone()),
            deep_dive: DeepDiveCoordinator::initialize(backend.clone()).await,
            admin: AdminApprovalCoordinator::new(backend.clone()),
            registration: RegistrationCoordinator::new(backend),
        }
    }

    pub fn form(&self) -> FormSelections {
        self.form
    }

    pub fn deep_dive(&self) -> &DeepDiveCoordinator {
        &self.deep_dive
    }

    pub fn admin(&self) -> &AdminApprovalCoordinator {
        &self.admin
    }

    /// 运行交互循环，直到 `quit` 或输入结束
    pub async fn run(&mut self) -> Result<()> {
        println!("{}", HELP_TEXT);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("> ");
            std::io::stdout().flush().context("无法刷新标准输出")?;

            let Some(line) = lines.next_line().await.context("读取输入失败")? else {
                break;
            };

            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };

            if command == Command::Quit {
                break;
            }

            for output in self.execute(command).await {
                println!("{}", output);
            }
        }

        info!("👋 退出");
        Ok(())
    }

    /// 执行一条命令，返回要输出的行
    pub async fn execute(&mut self, command: Command) -> Vec<String> {
        debug!("执行命令: {:?}", command);
        match command {
            Command::Help => vec![HELP_TEXT.to_string()],
            Command::Quit => Vec::new(),
            Command::SetIndustry(industry) => {
                self.form.industry = industry;
                vec![format!("🏭 Industry: {}", industry)]
            }
            Command::SetRole(role) => {
                self.form.role = role;
                vec![format!("🧩 Role: {}", role)]
            }
            Command::SetSystemType(system_type) => {
                self.form.system_type = system_type;
                vec![format!("🔧 System Type: {}", system_type)]
            }
            Command::Ask(question) => {
                let request =
                    ConsultationRequest::new(question, self.form.industry, self.form.role);
                let _ = self.consultation.submit(request).await;
                let state = self.consultation.snapshot();
                self.render_result(state.response.as_ref(), state.message.as_deref())
            }
            Command::Specs => {
                self.deep_dive.refresh_catalog().await;
                self.render_catalog()
            }
            Command::Select(filename) => {
                self.deep_dive.select_file(&filename);
                vec![self.deep_dive.snapshot().file_status().label().to_string()]
            }
            Command::Upload(path) => self.upload(&path).await,
            Command::DeepDive(question) => {
                let _ = self
                    .deep_dive
                    .perform_deep_dive(&question, self.form.industry, self.form.system_type)
                    .await;
                let state = self.deep_dive.snapshot();
                self.render_result(state.response.as_ref(), state.message.as_deref())
            }
            Command::Register { email, password } => {
                let _ = self.registration.register(&email, &password).await;
                self.registration.snapshot().message.into_iter().collect()
            }
            Command::Pending => {
                let _ = self.admin.fetch_pending().await;
                self.render_pending()
            }
            Command::Decide { id, approve } => {
                let _ = self.admin.decide(id, approve).await;
                self.render_pending()
            }
            Command::Status => self.render_status(),
        }
    }

    async fn upload(&self, path: &Path) -> Vec<String> {
        let upload = match SpecsUpload::from_path(path).await {
            Ok(upload) => upload,
            Err(e) => return vec![failure_message(format!("{:#}", e))],
        };
        let _ = self.deep_dive.upload(Some(upload)).await;

        let mut lines: Vec<String> = self.deep_dive.snapshot().message.into_iter().collect();
        lines.extend(self.render_catalog());
        lines
    }

    fn render_result(
        &self,
        response: Option<&ConsultationResponse>,
        message: Option<&str>,
    ) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(message) = message {
            lines.push(message.to_string());
        }
        if let Some(response) = response {
            lines.push("✅ AI Response:".to_string());
            lines.push(response.answer.clone());
            if let Some(report) = &response.report {
                match report_url(&self.base_url, report) {
                    Ok(url) => lines.push(format!("📄 Download AI Report: {}", url)),
                    Err(e) => debug!("无法生成报告链接: {}", e),
                }
            }
        }
        lines
    }

    fn render_catalog(&self) -> Vec<String> {
        let state = self.deep_dive.snapshot();
        let selected = state.selection.selected_filename();

        let mut lines = vec!["📄 Specs:".to_string()];
        if state.catalog.is_empty() {
            lines.push("  (none)".to_string());
        }
        for name in &state.catalog {
            let marker = if Some(name.as_str()) == selected { "▶" } else { " " };
            lines.push(format!(" {} {}", marker, name));
        }
        lines.push(state.file_status().label().to_string());
        lines
    }

    fn render_pending(&self) -> Vec<String> {
        let state = self.admin.snapshot();
        let mut lines: Vec<String> = state.message.into_iter().collect();
        for user in &state.pending {
            lines.push(format!("  #{} {}", user.id, user.email));
        }
        lines
    }

    fn render_status(&self) -> Vec<String> {
        let deep_dive = self.deep_dive.snapshot();
        vec![
            format!("🏭 Industry: {}", self.form.industry),
            format!("🧩 Role: {}", self.form.role),
            format!("🔧 System Type: {}", self.form.system_type),
            format!(
                "📄 Specs: {} ({})",
                deep_dive.selection.selected_filename().unwrap_or("-"),
                deep_dive.file_status().label()
            ),
            format!("⏳ Consultation: {}", self.consultation.snapshot().operation),
            format!("⏳ Deep Dive: {}", deep_dive.operation),
        ]
    }
}
