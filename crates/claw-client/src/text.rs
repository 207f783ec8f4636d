//! Localized user-facing message catalog
//!
//! Every connectivity failure surfaces as a timestamped, localized log
//! entry rather than a dialog, so all diagnostic wording lives here in
//! one place.

use claw_core::Language;
use rand::Rng;

/// Remote mode refuses to connect without a credential.
pub fn token_required(lang: Language) -> &'static str {
    match lang {
        Language::En => "Token required for Remote Mode.",
        Language::Zh => "远程模式需要令牌。",
    }
}

/// Connection attempt announcement. `target` carries no credential.
pub fn connecting(lang: Language, target: &str) -> String {
    match lang {
        Language::En => format!("Connecting to {target}..."),
        Language::Zh => format!("正在连接: {target}..."),
    }
}

/// Handshake succeeded.
pub fn connected(lang: Language) -> &'static str {
    match lang {
        Language::En => "OpenClaw Gateway Connected.",
        Language::Zh => "OpenClaw 网关已连接。",
    }
}

/// The link closed; includes the closure code and reason.
pub fn closed(lang: Language, code: u16, reason: &str) -> String {
    let reason = if reason.is_empty() { "-" } else { reason };
    match lang {
        Language::En => format!("Connection closed (code {code}: {reason})."),
        Language::Zh => format!("连接已关闭（代码 {code}: {reason}）。"),
    }
}

/// Falling back to the local simulation.
pub fn fallback(lang: Language) -> &'static str {
    match lang {
        Language::En => "Connection failed. Falling back to OpenClaw Simulation Mode.",
        Language::Zh => "连接失败。切换至 OpenClaw 模拟模式。",
    }
}

/// Command issued with no live or simulated link.
pub fn not_connected(lang: Language) -> &'static str {
    match lang {
        Language::En => "Not connected.",
        Language::Zh => "未连接。",
    }
}

/// Abnormal closure (1006): nothing answered at the target.
pub fn hint_unreachable(lang: Language, target: &str) -> String {
    match lang {
        Language::En => format!("Hint: is the OpenClaw gateway running at {target}?"),
        Language::Zh => format!("提示：OpenClaw 网关是否正在 {target} 运行？"),
    }
}

/// Policy-violation closure (1008): the gateway rejected the credential.
pub fn hint_token_rejected(lang: Language) -> &'static str {
    match lang {
        Language::En => "Hint: the gateway rejected the token. Check your API token.",
        Language::Zh => "提示：网关拒绝了令牌。请检查 API 令牌。",
    }
}

/// Normal closure during the handshake usually means a wrong path.
pub fn hint_wrong_path(lang: Language) -> &'static str {
    match lang {
        Language::En => "Hint: the gateway closed immediately. The URL path may be wrong.",
        Language::Zh => "提示：网关立即关闭了连接。URL 路径可能有误。",
    }
}

/// Plaintext scheme against a non-loopback host.
pub fn hint_plaintext_remote(lang: Language) -> &'static str {
    match lang {
        Language::En => "Hint: plaintext ws:// to a remote host is often blocked. Try wss://.",
        Language::Zh => "提示：对远程主机使用明文 ws:// 常被拦截。请尝试 wss://。",
    }
}

/// Seed entry presentation layers add at startup.
pub fn system_initialized(lang: Language) -> &'static str {
    match lang {
        Language::En => "System initialized. Waiting for OpenClaw Gateway...",
        Language::Zh => "系统已初始化。等待 OpenClaw 网关...",
    }
}

/// The canned simulation responses for a command.
pub fn mock_responses(lang: Language, command: &str) -> [String; 3] {
    match lang {
        Language::En => [
            format!("OpenClaw Simulation: Command \"{command}\" received."),
            format!("Executing: {command}... Done."),
            "Analyzing... I might need more context.".to_string(),
        ],
        Language::Zh => [
            format!("OpenClaw 模拟模式：已收到指令 \"{command}\""),
            format!("正在执行: {command}... 完成。"),
            "分析中... 似乎需要更多上下文。".to_string(),
        ],
    }
}

/// Pick one canned simulation response at random.
pub fn mock_reply(lang: Language, command: &str) -> String {
    let responses = mock_responses(lang, command);
    let index = rand::thread_rng().gen_range(0..responses.len());
    responses[index].clone()
}
