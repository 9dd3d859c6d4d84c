//! Web 服务器配置

use crate::env::{EnvConfig, EnvError, EnvResult, EnvVar};

/// Web 服务器配置
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// 绑定地址
    pub bind_addr: String,
    /// 端口
    pub port: u16,
}

impl WebConfig {
    /// 从已加载的环境配置构建
    pub fn from_env_config(env: &EnvConfig) -> Self {
        Self {
            bind_addr: env.web_bind_address.clone(),
            port: env.web_port,
        }
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        use crate::env::web;

        if self.bind_addr.trim().is_empty() {
            return Err(EnvError {
                variable: web::BindAddress::NAME.to_string(),
                message: "Bind address cannot be empty".to_string(),
            });
        }

        if self.port == 0 {
            return Err(EnvError {
                variable: web::Port::NAME.to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        Ok(())
    }

    /// 获取完整的监听地址
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
