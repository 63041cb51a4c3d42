use chat_widget::config::{WidgetConfig, load_dotenv};

fn main() -> anyhow::Result<()> {
    load_dotenv();
    let config = WidgetConfig::from_env()?;
    dioxus::LaunchBuilder::new()
        .with_context(config)
        .launch(chat_widget::ui::App);
    Ok(())
}
