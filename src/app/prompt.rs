// ==========================================
// 班级排课看板 - 终端交互
// ==========================================
// confirm: 提示写 stderr，从 stdin 读取一行答复
// notify: 写 stderr
// ==========================================

use std::io::{self, BufRead, Write};

use crate::api::UiCollaborator;

/// 终端确认/提示
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

/// 接受的肯定答复（瑞典语/英语）
fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "j" | "ja" | "y" | "yes"
    )
}

impl UiCollaborator for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        let mut stderr = io::stderr();
        if write!(stderr, "{} [j/N] ", message).and_then(|_| stderr.flush()).is_err() {
            return false;
        }

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_affirmative(&line),
        }
    }

    fn notify(&self, message: &str) {
        eprintln!("{}", message);
    }
}
