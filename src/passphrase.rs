//! 口令获取
//!
//! 命令行可以直接给出口令字面量，也可以给出 `-` 表示交互式输入。
//! 交互输入通过 `SecretSource` 注入，测试中不会触碰真实终端。

use zeroize::Zeroizing;

use crate::error::SaltencError;

/// 表示“交互式输入口令”的命令行占位符
pub const PROMPT_SENTINEL: &str = "-";

/// 交互提示语
pub const PROMPT: &str = "Enter password: ";

/// 读取一行秘密输入（不回显）的能力
pub trait SecretSource {
    fn read_secret(&mut self, prompt: &str) -> Result<Zeroizing<String>, SaltencError>;
}

/// 基于终端的实现，关闭回显后读取一行
pub struct TerminalPrompt;

impl SecretSource for TerminalPrompt {
    fn read_secret(&mut self, prompt: &str) -> Result<Zeroizing<String>, SaltencError> {
        rpassword::prompt_password(prompt)
            .map(Zeroizing::new)
            .map_err(|e| SaltencError::Passphrase(e.to_string()))
    }
}

/// 命令行上给出的口令
pub enum Passphrase {
    Literal(Zeroizing<String>),
    Prompt,
}

impl Passphrase {
    pub fn from_arg(arg: String) -> Self {
        if arg == PROMPT_SENTINEL {
            Self::Prompt
        } else {
            Self::Literal(Zeroizing::new(arg))
        }
    }

    /// 得到最终口令；`Prompt` 时从 `source` 读取
    pub fn resolve<S: SecretSource>(self, source: &mut S) -> Result<Zeroizing<String>, SaltencError> {
        match self {
            Self::Literal(pw) => Ok(pw),
            Self::Prompt => source.read_secret(PROMPT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        answer: &'static str,
        prompts: Vec<String>,
    }

    impl SecretSource for Scripted {
        fn read_secret(&mut self, prompt: &str) -> Result<Zeroizing<String>, SaltencError> {
            self.prompts.push(prompt.to_string());
            Ok(Zeroizing::new(self.answer.to_string()))
        }
    }

    struct Broken;

    impl SecretSource for Broken {
        fn read_secret(&mut self, _prompt: &str) -> Result<Zeroizing<String>, SaltencError> {
            Err(SaltencError::Passphrase("no tty".into()))
        }
    }

    #[test]
    fn literal_is_used_without_prompting() {
        let mut source = Scripted {
            answer: "unused",
            prompts: Vec::new(),
        };
        let pw = Passphrase::from_arg("foobar".into())
            .resolve(&mut source)
            .unwrap();
        assert_eq!(pw.as_str(), "foobar");
        assert!(source.prompts.is_empty());
    }

    #[test]
    fn dash_prompts_for_secret() {
        let mut source = Scripted {
            answer: "typed",
            prompts: Vec::new(),
        };
        let pw = Passphrase::from_arg("-".into()).resolve(&mut source).unwrap();
        assert_eq!(pw.as_str(), "typed");
        assert_eq!(source.prompts, vec![PROMPT.to_string()]);
    }

    #[test]
    fn prompt_failure_is_reported() {
        let result = Passphrase::from_arg("-".into()).resolve(&mut Broken);
        assert!(matches!(result, Err(SaltencError::Passphrase(_))));
    }
}
