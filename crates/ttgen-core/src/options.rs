//! Generation-time configuration (§6, §9).
//!
//! The source treats these as process-wide globals; the redesign note in
//! §9 requires collecting them into a value threaded through the generator
//! instead. Emitters read `GenOptions`; nothing in `ttgen-codegen` ever
//! writes through a `&mut GenOptions` once generation has started.

/// Which runtime major version the generated code targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum RuntimeGeneration {
    /// Legacy runtime: direct `&(variable)` redirects, no virtual dispatch
    /// on value/template classes, `is_present` alias instead of generic
    /// `get_param`.
    #[default]
    Legacy,
    /// Richer runtime: generic value-redirect class hierarchy, virtual
    /// dispatch overrides, generic `get_param`.
    Runtime2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CodecFlags {
    pub ber: bool,
    pub raw: bool,
    pub text: bool,
    pub xer: bool,
    pub json: bool,
}

impl Default for CodecFlags {
    fn default() -> Self {
        CodecFlags {
            ber: true,
            raw: true,
            text: true,
            xer: true,
            json: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GenOptions {
    pub runtime: RuntimeGeneration,
    /// Inserts a debug-scope marker at every new lexical scope and wraps
    /// return values in a store-return-value macro invocation.
    pub debugger_active: bool,
    /// Adds a second argument to `template.match(value, TRUE)` inside
    /// select-case matches so `*` behaves as "omit-in-value-list".
    pub omit_in_value_list: bool,
    pub codecs: CodecFlags,
}

impl Default for GenOptions {
    fn default() -> Self {
        GenOptions {
            runtime: RuntimeGeneration::default(),
            debugger_active: false,
            omit_in_value_list: false,
            codecs: CodecFlags::default(),
        }
    }
}

impl GenOptions {
    pub fn use_runtime_2(&self) -> bool {
        matches!(self.runtime, RuntimeGeneration::Runtime2)
    }
}
