#![allow(dead_code)]

use ai_consultant_client::error::{ApiError, ApiResult};
use ai_consultant_client::models::{
    ApprovalDecision, ConsultationRequest, ConsultationResponse, DeepDiveRequest, PendingUser,
    RegistrationRequest, ServerMessage, SpecsUpload, UploadReceipt,
};
use ai_consultant_client::ConsultantBackend;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// 后端收到的一次调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Consult(ConsultationRequest),
    DeepDive(DeepDiveRequest),
    ListSpecs,
    UploadSpecs(SpecsUpload),
    Register(RegistrationRequest),
    ListPendingUsers,
    ApproveUser(ApprovalDecision),
}

/// 预设的响应，可选地等待一个闸门放行
struct Reply<T> {
    gate: Option<Arc<Notify>>,
    result: ApiResult<T>,
}

impl<T> Reply<T> {
    async fn resolve(self) -> ApiResult<T> {
        if let Some(gate) = self.gate {
            gate.notified().await;
        }
        self.result
    }
}

type Queue<T> = Mutex<VecDeque<Reply<T>>>;

/// 按脚本返回结果、记录所有调用的后端
#[derive(Default)]
pub struct MockBackend {
    calls: Mutex<Vec<Call>>,
    consult: Queue<ConsultationResponse>,
    deep_dive: Queue<ConsultationResponse>,
    list_specs: Queue<Vec<String>>,
    /// 队列为空时 `/list_specs` 的固定返回
    specs: Mutex<Option<Vec<String>>>,
    upload: Queue<UploadReceipt>,
    register: Queue<ServerMessage>,
    pending: Queue<Vec<PendingUser>>,
    approve: Queue<ServerMessage>,
}

fn push<T>(queue: &Queue<T>, result: ApiResult<T>, gate: Option<Arc<Notify>>) {
    queue.lock().unwrap().push_back(Reply { gate, result });
}

fn next<T>(queue: &Queue<T>, endpoint: &str) -> Reply<T> {
    queue.lock().unwrap().pop_front().unwrap_or_else(|| Reply {
        gate: None,
        result: Err(connection_error(endpoint)),
    })
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn list_specs_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::ListSpecs))
    }

    pub fn network_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn push_consult(&self, result: ApiResult<ConsultationResponse>) {
        push(&self.consult, result, None);
    }

    pub fn push_consult_gated(&self, result: ApiResult<ConsultationResponse>, gate: Arc<Notify>) {
        push(&self.consult, result, Some(gate));
    }

    pub fn push_deep_dive(&self, result: ApiResult<ConsultationResponse>) {
        push(&self.deep_dive, result, None);
    }

    pub fn push_deep_dive_gated(
        &self,
        result: ApiResult<ConsultationResponse>,
        gate: Arc<Notify>,
    ) {
        push(&self.deep_dive, result, Some(gate));
    }

    pub fn push_list_specs(&self, result: ApiResult<Vec<String>>) {
        push(&self.list_specs, result, None);
    }

    pub fn push_list_specs_gated(&self, result: ApiResult<Vec<String>>, gate: Arc<Notify>) {
        push(&self.list_specs, result, Some(gate));
    }

    /// 设置 `/list_specs` 的固定返回
    pub fn set_specs(&self, specs: &[&str]) {
        *self.specs.lock().unwrap() = Some(specs.iter().map(|s| s.to_string()).collect());
    }

    pub fn push_upload(&self, result: ApiResult<UploadReceipt>) {
        push(&self.upload, result, None);
    }

    pub fn push_register(&self, result: ApiResult<ServerMessage>) {
        push(&self.register, result, None);
    }

    pub fn push_pending(&self, result: ApiResult<Vec<PendingUser>>) {
        push(&self.pending, result, None);
    }

    pub fn push_approve(&self, result: ApiResult<ServerMessage>) {
        push(&self.approve, result, None);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ConsultantBackend for MockBackend {
    async fn consult(&self, request: &ConsultationRequest) -> ApiResult<ConsultationResponse> {
        self.record(Call::Consult(request.clone()));
        next(&self.consult, "/consult").resolve().await
    }

    async fn deep_dive(&self, request: &DeepDiveRequest) -> ApiResult<ConsultationResponse> {
        self.record(Call::DeepDive(request.clone()));
        next(&self.deep_dive, "/deep_dive").resolve().await
    }

    async fn list_specs(&self) -> ApiResult<Vec<String>> {
        self.record(Call::ListSpecs);
        let scripted = self.list_specs.lock().unwrap().pop_front();
        match scripted {
            Some(reply) => reply.resolve().await,
            None => {
                let fixed = self.specs.lock().unwrap().clone();
                fixed.ok_or_else(|| connection_error("/list_specs"))
            }
        }
    }

    async fn upload_specs(&self, upload: &SpecsUpload) -> ApiResult<UploadReceipt> {
        self.record(Call::UploadSpecs(upload.clone()));
        next(&self.upload, "/upload_specs").resolve().await
    }

    async fn register(&self, request: &RegistrationRequest) -> ApiResult<ServerMessage> {
        self.record(Call::Register(request.clone()));
        next(&self.register, "/register").resolve().await
    }

    async fn list_pending_users(&self) -> ApiResult<Vec<PendingUser>> {
        self.record(Call::ListPendingUsers);
        next(&self.pending, "/list_pending_users").resolve().await
    }

    async fn approve_user(&self, decision: &ApprovalDecision) -> ApiResult<ServerMessage> {
        self.record(Call::ApproveUser(*decision));
        next(&self.approve, "/approve_user").resolve().await
    }
}

// ========== 构造辅助 ==========

pub fn answer(text: &str) -> ApiResult<ConsultationResponse> {
    Ok(ConsultationResponse {
        answer: text.to_string(),
        report: None,
    })
}

pub fn answer_with_report(text: &str, report: &str) -> ApiResult<ConsultationResponse> {
    Ok(ConsultationResponse {
        answer: text.to_string(),
        report: Some(report.to_string()),
    })
}

pub fn message(text: &str) -> ApiResult<ServerMessage> {
    Ok(ServerMessage {
        message: Some(text.to_string()),
        detail: None,
    })
}

pub fn http_error<T>(endpoint: &str, status: u16, detail: Option<&str>) -> ApiResult<T> {
    Err(ApiError::RequestFailed {
        endpoint: endpoint.to_string(),
        status,
        detail: detail.map(str::to_string),
    })
}

pub fn connection_error(endpoint: &str) -> ApiError {
    ApiError::Connection {
        endpoint: endpoint.to_string(),
        message: "connection refused".to_string(),
    }
}

pub fn user(id: i64, email: &str) -> PendingUser {
    PendingUser {
        id,
        email: email.to_string(),
    }
}

// ========== 一次性 HTTP 响应服务 ==========

/// 只接受一个连接的本地 HTTP 服务，返回固定响应
pub struct CannedServer {
    pub base_url: String,
    /// 收到的完整原始请求
    pub request: JoinHandle<String>,
}

/// 启动服务，`status_line` 形如 `200 OK`
pub async fn serve_once(status_line: &str, body: &str) -> CannedServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );

    let request = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let raw = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        raw
    });

    CannedServer {
        base_url: format!("http://{}", addr),
        request,
    }
}

/// 一个当前没有任何服务监听的本地地址
pub async fn unused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        if let Some(header_end) = find(&buf, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
            let body = &buf[header_end + 4..];
            if let Some(len) = content_length(&head) {
                if body.len() >= len {
                    break;
                }
            } else if head.contains("transfer-encoding: chunked") {
                if find(body, b"0\r\n\r\n").is_some() {
                    break;
                }
            } else {
                break;
            }
        }

        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn content_length(head: &str) -> Option<usize> {
    head.lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse().ok())
}

/// 原始请求中的请求体
pub fn request_body(raw: &str) -> &str {
    raw.split_once("\r\n\r\n").map(|(_, body)| body).unwrap_or("")
}
