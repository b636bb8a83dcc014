#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::Arc;
use tftest_gen::config::Config;
use tftest_gen::engines::BackendFamily;
use tftest_gen::llm::Dispatcher;
use tftest_gen::ui::Notifier;

/// Notifier that keeps every message for later assertions
#[derive(Default)]
pub struct RecordingNotifier {
    pub warnings: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn warn(&self, message: &str) {
        self.warnings.lock().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }
}

/// Config with every credential set and every backend pointed at `base_url`
pub fn config_for_mock_server(base_url: &str) -> Config {
    let mut config = Config::default();
    for family in BackendFamily::ALL {
        config.set_api_key(*family, format!("{}-test-key", family.name()));
        config.set_base_url(*family, base_url);
    }
    config
}

pub fn dispatcher(config: Config) -> (Dispatcher, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let dispatcher = Dispatcher::new(config, Arc::clone(&notifier) as Arc<dyn Notifier>);
    (dispatcher, notifier)
}

/// A response that follows the mandated section layout
pub fn well_formed_response(percent: u16) -> String {
    format!(
        "## Resource and variable summary\nOne AKS cluster, two variables.\n\n## Generated `.tftest.hcl` code block\n```hcl\nrun \"plan\" {{\n  command = plan\n}}\n```\n\n## Coverage summary\nEstimated {percent}% of resources covered.\n\n## Improvement suggestions\nAdd outputs for node pools."
    )
}
