//! `host:port` 地址规整。
//!
//! 允许配置中使用 `:8000` 这样省略主机的写法。

/// 监听地址：省略主机时绑定所有接口。
pub fn listen_addr(addr: &str) -> String {
    with_default_host(addr, "0.0.0.0")
}

/// 连接地址：省略主机时连接本机。
pub fn connect_addr(addr: &str) -> String {
    with_default_host(addr, "127.0.0.1")
}

fn with_default_host(addr: &str, host: &str) -> String {
    let addr = addr.trim();
    if addr.starts_with(':') {
        format!("{}{}", host, addr)
    } else {
        addr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_missing_host() {
        assert_eq!(listen_addr(":8000"), "0.0.0.0:8000");
        assert_eq!(connect_addr(":8001"), "127.0.0.1:8001");
        assert_eq!(connect_addr("controller:6653"), "controller:6653");
    }
}
