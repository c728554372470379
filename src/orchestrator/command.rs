//! 控制台命令解析

use std::path::PathBuf;

use crate::models::{Industry, Role, SystemType};

/// 控制台命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// 普通咨询
    Ask(String),
    SetIndustry(Industry),
    SetRole(Role),
    SetSystemType(SystemType),
    /// 刷新并显示规格文件列表
    Specs,
    /// 选择规格文件，空字符串表示取消
    Select(String),
    Upload(PathBuf),
    DeepDive(String),
    Register { email: String, password: String },
    Pending,
    Decide { id: i64, approve: bool },
    Status,
    Quit,
}

pub const HELP_TEXT: &str = "\
Commands:
  ask <question>              standard consultation
  industry <name>             Automotive | Aerospace | Healthcare | Energy | Manufacturing | IT
  role <name>                 general | embedded | cloud | manufacturing | security
  system <name>               embedded | cloud | manufacturing
  specs                       refresh and list specs files
  select [filename]           select a specs file (no name clears the selection)
  upload <path>               upload a specs file and select it
  deep <question>             deep dive against the selected specs file
  register <email> <password> request an account
  pending                     list users awaiting approval
  approve <id> | deny <id>    decide on a pending user
  status                      show current selections
  quit";

/// 解析一行输入
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "help" | "?" => Ok(Command::Help),
        "ask" => Ok(Command::Ask(rest.to_string())),
        "industry" => rest.parse().map(Command::SetIndustry),
        "role" => rest.parse().map(Command::SetRole),
        "system" => rest.parse().map(Command::SetSystemType),
        "specs" => Ok(Command::Specs),
        "select" => Ok(Command::Select(rest.to_string())),
        "upload" => {
            if rest.is_empty() {
                Err("用法: upload <path>".to_string())
            } else {
                Ok(Command::Upload(PathBuf::from(rest)))
            }
        }
        "deep" => Ok(Command::DeepDive(rest.to_string())),
        "register" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(email), Some(password), None) => Ok(Command::Register {
                    email: email.to_string(),
                    password: password.to_string(),
                }),
                _ => Err("用法: register <email> <password>".to_string()),
            }
        }
        "pending" => Ok(Command::Pending),
        "approve" | "deny" => {
            let id = rest
                .parse::<i64>()
                .map_err(|_| format!("无效的用户ID: {:?}", rest))?;
            Ok(Command::Decide {
                id,
                approve: head.eq_ignore_ascii_case("approve"),
            })
        }
        "status" => Ok(Command::Status),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err("请输入命令，help 查看帮助".to_string()),
        other => Err(format!("未知命令: {}", other)),
    }
}
