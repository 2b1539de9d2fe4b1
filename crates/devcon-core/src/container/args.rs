//! Argument lists for the `devcontainer` and `docker` CLIs.

use std::path::{Path, PathBuf};

/// Options for `devcontainer up`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpRequest {
    pub workspace: PathBuf,
    pub override_config: PathBuf,
    pub remove_existing_container: bool,
    pub build_no_cache: bool,
    pub gpu: bool,
}

impl UpRequest {
    pub fn new(workspace: impl Into<PathBuf>, override_config: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
            override_config: override_config.into(),
            remove_existing_container: false,
            build_no_cache: false,
            gpu: false,
        }
    }

    pub fn with_remove_existing_container(mut self, remove: bool) -> Self {
        self.remove_existing_container = remove;
        self
    }

    pub fn with_build_no_cache(mut self, no_cache: bool) -> Self {
        self.build_no_cache = no_cache;
        self
    }

    pub fn with_gpu(mut self, gpu: bool) -> Self {
        self.gpu = gpu;
        self
    }
}

pub fn up_args(request: &UpRequest) -> Vec<String> {
    let mut args = vec![
        "up".to_string(),
        "--workspace-folder".to_string(),
        request.workspace.display().to_string(),
        "--override-config".to_string(),
        request.override_config.display().to_string(),
    ];
    if request.remove_existing_container {
        args.push("--remove-existing-container".to_string());
    }
    if request.build_no_cache {
        args.push("--build-no-cache".to_string());
    }
    if request.gpu {
        args.extend(["--gpu-availability".to_string(), "all".to_string()]);
    }
    args
}

pub fn exec_args(workspace: &Path, command: &[String]) -> Vec<String> {
    let mut args = vec![
        "exec".to_string(),
        "--workspace-folder".to_string(),
        workspace.display().to_string(),
    ];
    args.extend(command.iter().cloned());
    args
}

/// Label filters tried in order when looking up a workspace's container.
pub fn container_label_filters(workspace: &Path) -> Vec<String> {
    let mut filters = vec![format!(
        "label=devcontainer.local_folder={}",
        workspace.display()
    )];
    if let Some(name) = workspace.file_name() {
        filters.push(format!(
            "label=vscode.devcontainer.id={}",
            name.to_string_lossy()
        ));
    }
    filters
}

pub fn ps_args(filter: &str) -> Vec<String> {
    vec![
        "ps".to_string(),
        "-q".to_string(),
        "-f".to_string(),
        filter.to_string(),
    ]
}

/// `docker compose -f <file> ps -q [service]`.
pub fn compose_ps_args(compose_file: &Path, service: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "compose".to_string(),
        "-f".to_string(),
        compose_file.display().to_string(),
        "ps".to_string(),
        "-q".to_string(),
    ];
    args.extend(service.map(str::to_string));
    args
}

pub fn inspect_args(container_id: &str) -> Vec<String> {
    vec!["inspect".to_string(), container_id.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_args_minimal() {
        let request = UpRequest::new("/src/app", "/tmp/override.json");
        assert_eq!(
            up_args(&request),
            vec![
                "up",
                "--workspace-folder",
                "/src/app",
                "--override-config",
                "/tmp/override.json"
            ]
        );
    }

    #[test]
    fn up_args_with_all_flags() {
        let request = UpRequest::new("/src/app", "/tmp/o.json")
            .with_remove_existing_container(true)
            .with_build_no_cache(true)
            .with_gpu(true);
        let args = up_args(&request);
        assert_eq!(
            &args[5..],
            &[
                "--remove-existing-container",
                "--build-no-cache",
                "--gpu-availability",
                "all"
            ]
        );
    }

    #[test]
    fn exec_args_append_command() {
        let command = vec!["npm".to_string(), "test".to_string()];
        assert_eq!(
            exec_args(Path::new("/src/app"), &command),
            vec!["exec", "--workspace-folder", "/src/app", "npm", "test"]
        );
    }

    #[test]
    fn label_filters_try_local_folder_then_id() {
        let filters = container_label_filters(Path::new("/src/my-app"));
        assert_eq!(
            filters,
            vec![
                "label=devcontainer.local_folder=/src/my-app",
                "label=vscode.devcontainer.id=my-app"
            ]
        );
        assert_eq!(
            ps_args(&filters[0]),
            vec!["ps", "-q", "-f", "label=devcontainer.local_folder=/src/my-app"]
        );
    }

    #[test]
    fn compose_ps_args_with_and_without_service() {
        let file = Path::new("/src/app/.devcontainer/compose.yml");
        assert_eq!(
            compose_ps_args(file, Some("app")),
            vec!["compose", "-f", "/src/app/.devcontainer/compose.yml", "ps", "-q", "app"]
        );
        assert_eq!(
            compose_ps_args(file, None),
            vec!["compose", "-f", "/src/app/.devcontainer/compose.yml", "ps", "-q"]
        );
    }
}
