#[derive(Clone, Copy, Debug)]
pub(crate) struct ToolDescriptor {
    pub(crate) name: &'static str,
    pub(crate) summary: &'static str,
}

pub(crate) const TOOL_CATALOG: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: "perfecto_help",
        summary: "Browse Perfecto documentation by category and read pages or extended commands.",
    },
    ToolDescriptor {
        name: "perfecto_ai_scriptless",
        summary: "List, filter and run AI Scriptless web tests.",
    },
    ToolDescriptor {
        name: "perfecto_ai_scriptless_mobile",
        summary: "List, filter and run AI Scriptless mobile tests on real devices.",
    },
    ToolDescriptor {
        name: "perfecto_skills",
        summary: "Discover and read Perfecto skills and their resources.",
    },
];

pub(crate) fn server_instructions() -> String {
    let mut out = String::from(
        "Perfecto tools for AI agents. Every tool takes {\"action\": ..., \"args\": {...}}.\n",
    );
    for tool in TOOL_CATALOG {
        out.push_str(&format!("- {}: {}\n", tool.name, tool.summary));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfecto_protocol::TOOLS_PREFIX;

    #[test]
    fn every_tool_carries_the_prefix() {
        for tool in TOOL_CATALOG {
            assert!(tool.name.starts_with(&format!("{TOOLS_PREFIX}_")), "{}", tool.name);
        }
        assert!(server_instructions().contains("perfecto_skills"));
    }
}
