use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "canvas-server",
    about = "Shares one drawing surface between every client in a room"
)]
pub struct Config {
    #[arg(long, env = "CANVAS_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "CANVAS_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Messages queued for a single client before it is evicted
    #[arg(long, env = "CANVAS_EGRESS_BUFFER", default_value_t = 64)]
    pub egress_buffer: usize,

    /// Allow cross-origin requests from any front end
    #[arg(long, env = "CANVAS_PERMISSIVE_CORS")]
    pub permissive_cors: bool,
}
