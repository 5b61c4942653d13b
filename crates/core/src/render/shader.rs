//! Shader compilation and linking helpers for WebGL / OpenGL ES.
//!
//! Provides error types, source formatting for debugging, and functions
//! to compile individual shader stages and link them into programs.
//! The compilation/linking functions go through a [`GlBackend`]; the
//! formatting utilities are pure string processing.

use std::fmt;

use thiserror::Error;

use super::backend::GlBackend;

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// The GL enum passed to `createShader`.
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors that can occur during shader compilation or program linking.
#[derive(Debug, Clone, Error)]
pub enum ShaderError {
    /// A shader stage failed to compile.
    #[error("shader compile error ({stage}):\n{log}")]
    Compile {
        /// The shader stage that failed.
        stage: ShaderStage,
        /// Numbered source followed by the driver's info log.
        log: String,
    },
    /// A program failed to link.
    #[error("shader link error:\n{0}")]
    Link(String),
    /// Linking was requested without a compiled shader for this stage.
    #[error("no compiled {0} shader to link")]
    MissingStage(ShaderStage),
    /// The context refused to create a shader or program object.
    #[error("failed to create {object}: {reason}")]
    Create {
        /// `"shader"` or `"program"`.
        object: &'static str,
        /// The context's message.
        reason: String,
    },
}

/// Formats a shader compilation error for human-readable debugging.
///
/// Prepends right-aligned line numbers to each line of `source`, then
/// appends the driver's error `log`. This makes it easy to correlate
/// error messages (which reference line numbers) with the actual GLSL.
///
/// Both `source` and `log` may be empty; the function handles all
/// combinations gracefully.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let source_lines: Vec<&str> = source.lines().collect();
    let width = source_lines.len().max(1).to_string().len();

    let numbered = source_lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, true) => String::new(),
        (true, false) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

/// Compiles a single shader stage.
///
/// On failure the shader object is deleted and the diagnostic is logged
/// before being returned, so callers only need to abort.
///
/// # Errors
///
/// Returns `ShaderError::Compile` if the GLSL source fails to compile, or
/// `ShaderError::Create` if no shader object could be allocated.
pub fn compile_shader<B: GlBackend>(
    gl: &B,
    source: &str,
    stage: ShaderStage,
) -> Result<B::Shader, ShaderError> {
    let shader = gl
        .create_shader(stage.gl_enum())
        .map_err(|reason| ShaderError::Create {
            object: "shader",
            reason,
        })?;

    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if gl.shader_compile_status(shader) {
        return Ok(shader);
    }

    let info_log = gl.shader_info_log(shader);
    gl.delete_shader(shader);
    let err = ShaderError::Compile {
        stage,
        log: format_shader_error(source, &info_log),
    };
    log::error!("{err}");
    Err(err)
}

/// Links a vertex and fragment shader into a program and makes it current.
///
/// Either shader may be absent (a failed compile upstream); in that case no
/// program object is created and nothing is linked.
///
/// # Errors
///
/// Returns `ShaderError::MissingStage` if a stage is absent,
/// `ShaderError::Link` if linking fails, or `ShaderError::Create` if no
/// program object could be allocated.
pub fn link_program<B: GlBackend>(
    gl: &B,
    vertex: Option<B::Shader>,
    fragment: Option<B::Shader>,
) -> Result<B::Program, ShaderError> {
    let vertex = vertex.ok_or(ShaderError::MissingStage(ShaderStage::Vertex))?;
    let fragment = fragment.ok_or(ShaderError::MissingStage(ShaderStage::Fragment))?;

    let program = gl.create_program().map_err(|reason| ShaderError::Create {
        object: "program",
        reason,
    })?;

    gl.attach_shader(program, vertex);
    gl.attach_shader(program, fragment);
    gl.link_program(program);

    if gl.program_link_status(program) {
        gl.use_program(Some(program));
        log::info!("program linked");
        return Ok(program);
    }

    let info_log = gl.program_info_log(program);
    gl.delete_program(program);
    let err = ShaderError::Link(info_log);
    log::error!("{err}");
    Err(err)
}

/// Compiles vertex and fragment sources and links them into a program.
///
/// This is a convenience wrapper around [`compile_shader`] and [`link_program`].
/// Intermediate shader objects are released regardless of success or failure;
/// a linked program keeps its own reference to them.
///
/// # Errors
///
/// Returns `ShaderError::Compile` if either shader fails to compile,
/// or `ShaderError::Link` if linking fails.
pub fn compile_program<B: GlBackend>(
    gl: &B,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<B::Program, ShaderError> {
    let vert = compile_shader(gl, vertex_src, ShaderStage::Vertex)?;
    let frag = match compile_shader(gl, fragment_src, ShaderStage::Fragment) {
        Ok(f) => f,
        Err(e) => {
            gl.delete_shader(vert);
            return Err(e);
        }
    };

    let result = link_program(gl, Some(vert), Some(frag));

    gl.delete_shader(vert);
    gl.delete_shader(frag);

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingGl};

    const TRIANGLE_VS: &str =
        "attribute vec3 position; void main(){gl_Position=vec4(position,1.0);}";
    const TRIANGLE_FS: &str =
        "precision mediump float; void main(){gl_FragColor=vec4(1.0);}";
    const BROKEN_FS: &str = "void main(){gl_FragColor=vec4(1.0);";

    // --- format_shader_error tests ---

    #[test]
    fn format_shader_error_prepends_line_numbers() {
        let source = "attribute vec3 position;\nvoid main() {\n}\n";
        let log = "ERROR: 0:2: syntax error";
        let formatted = format_shader_error(source, log);

        assert!(
            formatted.contains("1: attribute vec3 position;"),
            "expected line 1 with content, got:\n{formatted}"
        );
        assert!(
            formatted.contains("2: void main() {"),
            "expected line 2 with content, got:\n{formatted}"
        );
        assert!(
            formatted.contains("3: }"),
            "expected line 3 with content, got:\n{formatted}"
        );
        assert!(
            formatted.contains(log),
            "expected driver log in output, got:\n{formatted}"
        );
    }

    #[test]
    fn format_shader_error_handles_empty_inputs() {
        assert_eq!(format_shader_error("", "some error"), "some error");
        assert_eq!(format_shader_error("void main() {}", ""), "1: void main() {}");
        assert!(format_shader_error("", "").is_empty());
    }

    #[test]
    fn format_shader_error_right_aligns_line_numbers() {
        let source = (1..=12)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let formatted = format_shader_error(&source, "err");
        let lines: Vec<&str> = formatted.lines().collect();

        assert!(
            lines[0].starts_with(" 1: "),
            "expected right-aligned single digit, got: '{}'",
            lines[0]
        );
        assert!(
            lines[9].starts_with("10: "),
            "expected no padding for double digit, got: '{}'",
            lines[9]
        );
    }

    // --- ShaderError Display tests ---

    #[test]
    fn compile_error_display_includes_stage_and_log() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            log: "undeclared identifier".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("fragment"), "missing stage in: {msg}");
        assert!(msg.contains("undeclared identifier"), "missing log in: {msg}");
    }

    #[test]
    fn missing_stage_display_names_stage() {
        let msg = ShaderError::MissingStage(ShaderStage::Vertex).to_string();
        assert!(msg.contains("vertex"), "missing stage in: {msg}");
    }

    #[test]
    fn stage_maps_to_gl_enum() {
        assert_eq!(ShaderStage::Vertex.gl_enum(), glow::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_enum(), glow::FRAGMENT_SHADER);
    }

    // --- compile / link against the recording backend ---

    #[test]
    fn compile_shader_returns_handle_for_valid_source() {
        let gl = RecordingGl::new();
        let shader = compile_shader(&gl, TRIANGLE_VS, ShaderStage::Vertex);
        assert!(shader.is_ok(), "expected Ok, got {shader:?}");
        assert!(gl.calls().contains(&Call::CompileShader(shader.unwrap())));
    }

    #[test]
    fn compile_shader_reports_diagnostic_and_deletes_object_on_syntax_error() {
        let gl = RecordingGl::new();
        let err = compile_shader(&gl, BROKEN_FS, ShaderStage::Fragment).unwrap_err();

        match &err {
            ShaderError::Compile { stage, log } => {
                assert_eq!(*stage, ShaderStage::Fragment);
                assert!(log.contains("1: void main()"), "missing source in: {log}");
                assert!(log.contains("ERROR"), "missing driver log in: {log}");
            }
            other => panic!("expected Compile error, got {other:?}"),
        }
        assert!(gl
            .calls()
            .iter()
            .any(|c| matches!(c, Call::DeleteShader(_))));
    }

    #[test]
    fn link_program_makes_linked_program_current() {
        let gl = RecordingGl::new();
        let vs = compile_shader(&gl, TRIANGLE_VS, ShaderStage::Vertex).ok();
        let fs = compile_shader(&gl, TRIANGLE_FS, ShaderStage::Fragment).ok();

        let program = link_program(&gl, vs, fs).unwrap();

        assert_eq!(gl.current_program(), Some(program));
        let calls = gl.calls();
        assert!(calls.contains(&Call::LinkProgram(program)));
        assert_eq!(calls.last(), Some(&Call::UseProgram(Some(program))));
    }

    #[test]
    fn link_program_with_absent_shader_does_not_attempt_link() {
        let gl = RecordingGl::new();
        let vs = compile_shader(&gl, TRIANGLE_VS, ShaderStage::Vertex).ok();
        let fs = compile_shader(&gl, BROKEN_FS, ShaderStage::Fragment).ok();
        assert!(fs.is_none());
        gl.clear_calls();

        let err = link_program(&gl, vs, fs).unwrap_err();

        assert!(matches!(
            err,
            ShaderError::MissingStage(ShaderStage::Fragment)
        ));
        assert!(gl.calls().is_empty(), "no GL calls expected, got {:?}", gl.calls());
        assert_eq!(gl.current_program(), None);
    }

    #[test]
    fn link_program_reports_linker_log_on_failure() {
        let gl = RecordingGl::new();
        gl.fail_next_link("varying v_color not written by vertex shader");
        let vs = compile_shader(&gl, TRIANGLE_VS, ShaderStage::Vertex).ok();
        let fs = compile_shader(&gl, TRIANGLE_FS, ShaderStage::Fragment).ok();

        let err = link_program(&gl, vs, fs).unwrap_err();

        match err {
            ShaderError::Link(log) => assert!(log.contains("v_color"), "got: {log}"),
            other => panic!("expected Link error, got {other:?}"),
        }
        assert_eq!(gl.current_program(), None);
        assert!(gl
            .calls()
            .iter()
            .any(|c| matches!(c, Call::DeleteProgram(_))));
    }

    #[test]
    fn compile_program_links_first_triangle_shaders() {
        let gl = RecordingGl::new();
        let program = compile_program(&gl, TRIANGLE_VS, TRIANGLE_FS).unwrap();
        assert_eq!(gl.current_program(), Some(program));
    }

    #[test]
    fn compile_program_releases_vertex_shader_when_fragment_fails() {
        let gl = RecordingGl::new();
        let err = compile_program(&gl, TRIANGLE_VS, BROKEN_FS).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { .. }));

        let deleted = gl
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::DeleteShader(_)))
            .count();
        assert_eq!(deleted, 2, "both shader objects should be deleted");
        assert!(!gl.calls().iter().any(|c| matches!(c, Call::LinkProgram(_))));
    }

    #[test]
    fn shader_error_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ShaderError>();
    }
}
