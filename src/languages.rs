use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

/// Source extensions counted as code. Markup, data and config formats are
/// not listed and never show up as a language.
pub const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    (".py", "Python"),
    (".ts", "TypeScript"),
    (".tsx", "TypeScript"),
    (".js", "JavaScript"),
    (".jsx", "JavaScript"),
    (".mjs", "JavaScript"),
    (".cjs", "JavaScript"),
    (".java", "Java"),
    (".cpp", "C++"),
    (".cc", "C++"),
    (".cxx", "C++"),
    (".hpp", "C++"),
    (".hh", "C++"),
    (".hxx", "C++"),
    (".c", "C"),
    // Ambiguous between C and C++ without looking at the content.
    (".h", "C/C++"),
    (".cu", "CUDA"),
    (".cuh", "CUDA"),
    (".cs", "C#"),
    (".go", "Go"),
    (".rs", "Rust"),
    (".rb", "Ruby"),
    (".php", "PHP"),
    (".swift", "Swift"),
    (".kt", "Kotlin"),
    (".kts", "Kotlin"),
    (".scala", "Scala"),
    (".r", "R"),
    // Also MATLAB, which is not counted.
    (".m", "Objective-C"),
    (".sh", "Shell"),
    (".bash", "Shell"),
    (".zsh", "Shell"),
    (".sql", "SQL"),
    (".vue", "Vue"),
    (".dart", "Dart"),
    (".lua", "Lua"),
    (".perl", "Perl"),
    (".pl", "Perl"),
    (".pm", "Perl"),
];

static EXTENSION_TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| LANGUAGE_EXTENSIONS.iter().copied().collect());

/// Language for a file path, judged by the extension of its last component.
pub fn classify(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?;
    let key = format!(".{}", ext.to_ascii_lowercase());
    EXTENSION_TABLE.get(key.as_str()).copied()
}

/// Destination path of a numstat rename entry.
///
/// `git --numstat` writes renames either as `old => new` or with the common
/// part factored out, `src/{old.rs => new.rs}`. Plain paths pass through.
pub fn rename_destination(path: &str) -> String {
    if let (Some(open), Some(close)) = (path.find('{'), path.rfind('}')) {
        if open < close {
            let inner = &path[open + 1..close];
            if let Some((_, new)) = inner.split_once(" => ") {
                let joined = format!("{}{}{}", &path[..open], new, &path[close + 1..]);
                return joined.replace("//", "/");
            }
        }
    }
    match path.split_once(" => ") {
        Some((_, new)) => new.to_string(),
        None => path.to_string(),
    }
}
