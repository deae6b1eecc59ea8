use std::io::Write;

/// 初始化全局 logger
///
/// 格式：`[时间] LEVEL [文件:行号] 内容`，级别带颜色。
/// 默认过滤等级 Info，可通过 `RUST_LOG` 覆盖。
pub fn init_log() {
    env_logger::Builder::new()
        .format(|buf, record| {
            let level_style = match record.level() {
                log::Level::Info => buf
                    .default_level_style(log::Level::Info)
                    .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
                log::Level::Warn => buf
                    .default_level_style(log::Level::Warn)
                    .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
                log::Level::Error => buf
                    .default_level_style(log::Level::Error)
                    .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
                _ => buf.default_level_style(record.level()),
            };
            let grey_style =
                buf.default_level_style(record.level()).fg_color(Some(anstyle::Color::Rgb(anstyle::RgbColor(
                    110, 110, 110,
                ))));

            let line = record.line().unwrap_or(!0);
            let file = record.file().unwrap_or("").rsplit(['/', '\\']).next().unwrap_or("");
            let time = chrono::Local::now().format("%H:%M:%S");
            let level = record.level();

            writeln!(
                buf,
                "{level_style}[{time}] {level}{level_style:#} {grey_style}[{file}:{line}]{grey_style:#} {}",
                record.args()
            )
        })
        .filter(None, log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
