//! Static file server stages

use crate::plan::StaticServer;

pub const CADDY_IMAGE: &str = "caddy:2-alpine";
pub const NGINX_IMAGE: &str = "nginx:1.27-alpine";

pub struct ServerLayout {
    pub image: &'static str,
    pub config_path: &'static str,
    pub web_root: &'static str,
}

pub fn layout(server: StaticServer) -> ServerLayout {
    match server {
        StaticServer::Caddy => ServerLayout {
            image: CADDY_IMAGE,
            config_path: "/etc/caddy/Caddyfile",
            web_root: "/srv",
        },
        StaticServer::Nginx => ServerLayout {
            image: NGINX_IMAGE,
            config_path: "/etc/nginx/conf.d/default.conf",
            web_root: "/usr/share/nginx/html",
        },
    }
}

/// Server configuration, without a trailing newline.
pub fn config(server: StaticServer, spa: bool) -> String {
    let root = layout(server).web_root;
    match server {
        StaticServer::Caddy => {
            let fallback = if spa {
                "\n\ttry_files {path} /index.html"
            } else {
                ""
            };
            format!(
                ":80 {{\n\troot * {root}\n\tencode gzip{fallback}\n\tfile_server\n}}",
                root = root,
                fallback = fallback
            )
        }
        StaticServer::Nginx => {
            let fallback = if spa { "/index.html" } else { "=404" };
            format!(
                "server {{\n    listen 80;\n    server_name _;\n    root {root};\n    index index.html;\n\n    location / {{\n        try_files $uri $uri/ {fallback};\n    }}\n}}",
                root = root,
                fallback = fallback
            )
        }
    }
}
