//! Registry of the languages the playground offers.
//!
//! Each language is pinned to a runtime version known to work on the remote
//! engine. The engine's own "latest" selector is unreliable for several
//! runtimes, so callers that do not name a version get the pinned one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    Python,
    Java,
    Javascript,
    Typescript,
    C,
    Cpp,
    Go,
    Rust,
}

impl LanguageId {
    pub const ALL: [LanguageId; 8] = [
        LanguageId::Python,
        LanguageId::Java,
        LanguageId::Javascript,
        LanguageId::Typescript,
        LanguageId::C,
        LanguageId::Cpp,
        LanguageId::Go,
        LanguageId::Rust,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageId::Python => "python",
            LanguageId::Java => "java",
            LanguageId::Javascript => "javascript",
            LanguageId::Typescript => "typescript",
            LanguageId::C => "c",
            LanguageId::Cpp => "cpp",
            LanguageId::Go => "go",
            LanguageId::Rust => "rust",
        }
    }

    /// The registry entry for this language.
    pub fn descriptor(&self) -> &'static LanguageDescriptor {
        // LANGUAGES is ordered like LanguageId::ALL
        &LANGUAGES[*self as usize]
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("Unsupported language: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDescriptor {
    pub id: LanguageId,
    pub display_name: &'static str,
    pub default_version: &'static str,
    pub file_name: &'static str,
    pub editor_mode: &'static str,
    pub template: &'static str,
}

static LANGUAGES: [LanguageDescriptor; 8] = [
    LanguageDescriptor {
        id: LanguageId::Python,
        display_name: "Python",
        default_version: "3.10.0",
        file_name: "main.py",
        editor_mode: "python",
        template: "# Online Python compiler\n# Write Python 3 code and run it\n\nprint(\"Hello, World!\")",
    },
    LanguageDescriptor {
        id: LanguageId::Java,
        display_name: "Java",
        default_version: "15.0.2",
        file_name: "Main.java",
        editor_mode: "java",
        template: "// Online Java compiler\n// Write Java code and run it\n\npublic class Main {\n    public static void main(String[] args) {\n        System.out.println(\"Hello, World!\");\n    }\n}",
    },
    LanguageDescriptor {
        id: LanguageId::Javascript,
        display_name: "JavaScript",
        default_version: "18.15.0",
        file_name: "index.js",
        editor_mode: "javascript",
        template: "// Online JavaScript compiler\n// Write JavaScript code and run it\n\nconsole.log(\"Hello, World!\");",
    },
    LanguageDescriptor {
        id: LanguageId::Typescript,
        display_name: "TypeScript",
        default_version: "5.0.3",
        file_name: "index.ts",
        editor_mode: "typescript",
        template: "// Online TypeScript compiler\n// Write TypeScript code and run it\n\nconst message: string = \"Hello, World!\";\nconsole.log(message);",
    },
    LanguageDescriptor {
        id: LanguageId::C,
        display_name: "C",
        default_version: "10.2.0",
        file_name: "main.c",
        editor_mode: "c",
        template: "// Online C compiler\n// Write C code and run it\n\n#include <stdio.h>\n\nint main() {\n    printf(\"Hello, World!\\n\");\n    return 0;\n}",
    },
    LanguageDescriptor {
        id: LanguageId::Cpp,
        display_name: "C++",
        default_version: "10.2.0",
        file_name: "main.cpp",
        editor_mode: "cpp",
        template: "// Online C++ compiler\n// Write C++ code and run it\n\n#include <iostream>\nusing namespace std;\n\nint main() {\n    cout << \"Hello, World!\" << endl;\n    return 0;\n}",
    },
    LanguageDescriptor {
        id: LanguageId::Go,
        display_name: "Go",
        default_version: "1.16.2",
        file_name: "main.go",
        editor_mode: "go",
        template: "// Online Go compiler\n// Write Go code and run it\n\npackage main\n\nimport \"fmt\"\n\nfunc main() {\n    fmt.Println(\"Hello, World!\")\n}",
    },
    LanguageDescriptor {
        id: LanguageId::Rust,
        display_name: "Rust",
        default_version: "1.68.2",
        file_name: "main.rs",
        editor_mode: "rust",
        template: "// Online Rust compiler\n// Write Rust code and run it\n\nfn main() {\n    println!(\"Hello, World!\");\n}",
    },
];

/// Look up a language by its identifier. Unknown identifiers yield `None`.
pub fn lookup(id: &str) -> Option<&'static LanguageDescriptor> {
    LANGUAGES.iter().find(|descriptor| descriptor.id.as_str() == id)
}

/// All registered languages in display order.
pub fn all() -> &'static [LanguageDescriptor] {
    &LANGUAGES
}
