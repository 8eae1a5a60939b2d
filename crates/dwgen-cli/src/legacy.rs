//! Colon-style argument syntax kept for existing pipelines.
//!
//! `--devfile-url:<url>` becomes `--devfile-url=<url>`,
//! `--project.<name>=<location>` becomes `--project=<name>=<location>` and
//! the camelCase flags map onto their kebab-case equivalents.

/// Colon-style flags and the clap flag each maps to
const COLON_FLAGS: [(&str, &str); 8] = [
    ("--devfile-path:", "--devfile-path"),
    ("--devfile-url:", "--devfile-url"),
    ("--editor-url:", "--editor-url"),
    ("--editor-path:", "--editor-path"),
    ("--output-file:", "--output-file"),
    ("--devcontainer-json:", "--devcontainer-json"),
    ("--injectDefaultComponent:", "--inject-default-component"),
    ("--defaultComponentImage:", "--default-component-image"),
];

const PROJECT_PREFIX: &str = "--project.";

/// Placeholder emitted by some launchers, and the template form the
/// workspace controller expands.
const INTERNAL_URL_PLACEHOLDER: (&str, &str) = ("{{_INTERNAL_URL_}}", "{{ INTERNAL_URL }}");

/// Rewrite legacy arguments; anything else passes through untouched.
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter().map(normalize_arg).collect()
}

fn normalize_arg(arg: String) -> String {
    for (prefix, flag) in COLON_FLAGS {
        if let Some(value) = arg.strip_prefix(prefix) {
            return format!("{}={}", flag, value);
        }
    }

    if let Some(project) = arg.strip_prefix(PROJECT_PREFIX)
        && project.contains('=')
    {
        let (placeholder, template) = INTERNAL_URL_PLACEHOLDER;
        return format!("--project={}", project.replace(placeholder, template));
    }

    arg
}
