use super::*;
use std::{
    env, fs,
    io::Cursor,
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use client_core::{GenerationError, GenerationRequest, ImageGenerator};
use crossbeam_channel::bounded;
use shared::domain::{CreateFunction, EditFunction};

use crate::backend_bridge::runtime::launch;

/// Records every request and answers from a fixed script.
struct ScriptedGenerator {
    seen: Arc<Mutex<Vec<GenerationRequest>>>,
    reply_with_image: bool,
}

#[async_trait]
impl ImageGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.seen.lock().expect("lock").push(request.clone());
        if self.reply_with_image {
            Ok("data:image/png;base64,iVBORw0K".to_string())
        } else {
            Err(GenerationError::NoImageInResponse)
        }
    }
}

fn temp_root(label: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let root = env::temp_dir().join(format!("gerador_shell_{label}_{suffix}"));
    fs::create_dir_all(&root).expect("temp root");
    root
}

fn shell_with(
    reply_with_image: bool,
    output_dir: PathBuf,
) -> (Shell, Arc<Mutex<Vec<GenerationRequest>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let generator = ScriptedGenerator {
        seen: Arc::clone(&seen),
        reply_with_image,
    };
    let (cmd_tx, cmd_rx) = bounded(4);
    let (ui_tx, ui_rx) = bounded(16);
    launch(Arc::new(generator), cmd_rx, ui_tx);
    (Shell::new(cmd_tx, ui_rx, output_dir), seen)
}

fn run_script(shell: &mut Shell, script: &str) -> String {
    let mut out = Vec::new();
    shell
        .run(Cursor::new(script.to_string()), &mut out)
        .expect("session runs");
    String::from_utf8(out).expect("utf8 output")
}

#[test]
fn parses_commands_and_arguments() {
    assert_eq!(parse_line("   ").expect("blank"), None);
    assert_eq!(
        parse_line("mode edit").expect("mode"),
        Some(ShellCommand::Mode(Mode::Edit))
    );
    assert_eq!(
        parse_line("function logo").expect("function"),
        Some(ShellCommand::Function(Function::Create(CreateFunction::Text)))
    );
    assert_eq!(
        parse_line("ratio 9:16").expect("ratio"),
        Some(ShellCommand::Ratio(AspectRatio::Tall))
    );
    assert_eq!(
        parse_line("prompt  a cat  in space ").expect("prompt"),
        Some(ShellCommand::Prompt("a cat  in space".to_string()))
    );
    assert_eq!(
        parse_line("image 2 ./refs/mask.png").expect("image"),
        Some(ShellCommand::Image {
            slot: ImageSlot::Second,
            path: PathBuf::from("./refs/mask.png"),
        })
    );
    assert_eq!(
        parse_line("save").expect("save"),
        Some(ShellCommand::Save(None))
    );
    assert_eq!(
        parse_line("save /tmp/out").expect("save dir"),
        Some(ShellCommand::Save(Some(PathBuf::from("/tmp/out"))))
    );
}

#[test]
fn reports_bad_input_without_panicking() {
    assert_eq!(
        parse_line("paint it"),
        Err(ShellError::UnknownCommand("paint".to_string()))
    );
    assert_eq!(
        parse_line("ratio"),
        Err(ShellError::MissingArgument("aspect ratio"))
    );
    assert_eq!(
        parse_line("image 1"),
        Err(ShellError::MissingArgument("image path"))
    );
    assert!(matches!(
        parse_line("ratio 2:1"),
        Err(ShellError::InvalidArgument(ParseTagError::AspectRatio(_)))
    ));
    assert!(matches!(
        parse_line("image 3 a.png"),
        Err(ShellError::InvalidArgument(ParseTagError::ImageSlot(_)))
    ));
}

#[test]
fn switching_mode_lists_that_modes_functions() {
    let root = temp_root("mode_list");
    let (mut shell, _) = shell_with(true, root.clone());

    let output = run_script(&mut shell, "mode edit\nquit\n");

    assert!(output.contains(
        "mode edit, function OBJECTS (available: add-remove, retouch, style, compose)"
    ));

    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn blank_create_prompt_never_reaches_the_backend() {
    let root = temp_root("blank");
    let (mut shell, seen) = shell_with(true, root.clone());

    let output = run_script(&mut shell, "prompt    \ngenerate\nquit\n");

    assert!(seen.lock().expect("lock").is_empty());
    assert!(!shell.state.is_loading);
    assert!(!output.contains("Generating your design"));

    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn sticker_session_generates_and_saves() {
    let root = temp_root("sticker");
    let (mut shell, seen) = shell_with(true, root.clone());

    let output = run_script(
        &mut shell,
        "function sticker\nratio 4:3\nprompt a cat\ngenerate\nsave\nquit\n",
    );

    let seen = seen.lock().expect("lock");
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].rendered_prompt(),
        "Sticker die-cut style: a cat. High quality, white border, isolated."
    );
    assert_eq!(seen[0].aspect_ratio, AspectRatio::Landscape);
    assert!(seen[0].parts().iter().all(|part| part.inline_data.is_none()));

    assert!(output.contains("Generating your design..."));
    assert!(output.contains("result ready (image/png)"));
    assert!(!shell.state.is_loading);
    assert!(shell.state.result_image.is_some());

    let saved: Vec<_> = fs::read_dir(&root)
        .expect("read output dir")
        .map(|entry| entry.expect("entry").file_name())
        .collect();
    assert_eq!(saved.len(), 1);
    let name = saved[0].to_string_lossy();
    assert!(name.starts_with("gerador30-") && name.ends_with(".png"));

    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn compose_session_sends_both_images_in_slot_order() {
    let root = temp_root("compose");
    fs::write(root.join("base.png"), b"base").expect("write base");
    fs::write(root.join("overlay.jpg"), b"overlay").expect("write overlay");
    let (mut shell, seen) = shell_with(true, root.clone());

    let script = format!(
        "mode edit\nfunction compose\nimage 1 {}\nimage 2 {}\nprompt blend them\ngenerate\nquit\n",
        root.join("base.png").display(),
        root.join("overlay.jpg").display()
    );
    run_script(&mut shell, &script);

    let seen = seen.lock().expect("lock");
    assert_eq!(seen.len(), 1);
    let parts = seen[0].parts();
    assert_eq!(
        parts[0].text.as_deref(),
        Some("Merge these two images based on: blend them. Seamless composite.")
    );
    let first = parts[1].inline_data.as_ref().expect("first image");
    let second = parts[2].inline_data.as_ref().expect("second image");
    assert_eq!(first.mime_type, "image/png");
    assert_eq!(first.data, "YmFzZQ==");
    assert_eq!(second.mime_type, "image/jpeg");
    assert_eq!(second.data, "b3ZlcmxheQ==");

    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn images_are_refused_outside_edit_mode_and_slot_two_outside_compose() {
    let root = temp_root("gating");
    fs::write(root.join("base.png"), b"base").expect("write base");
    let (mut shell, _) = shell_with(true, root.clone());
    let path = root.join("base.png");

    let output = run_script(
        &mut shell,
        &format!(
            "image 1 {p}\nmode edit\nimage 2 {p}\nquit\n",
            p = path.display()
        ),
    );

    assert!(output.contains("run `mode edit` first"));
    assert!(output.contains("slot 2 is only used by `function compose`"));
    assert!(shell.state.image1.is_none());
    assert!(shell.state.image2.is_none());

    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn failed_generation_ends_loading_with_no_result() {
    let root = temp_root("failure");
    let (mut shell, seen) = shell_with(false, root.clone());
    shell.state_mut().result_image = Some("data:image/png;base64,c3RhbGU=".to_string());

    let output = run_script(&mut shell, "prompt a cat\ngenerate\nsave\nquit\n");

    assert_eq!(seen.lock().expect("lock").len(), 1);
    assert!(!shell.state.is_loading);
    assert!(shell.state.result_image.is_none());
    assert!(output.contains("no result"));
    assert!(output.contains("nothing to save yet"));

    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn edit_promotes_result_for_retouching() {
    let root = temp_root("promote");
    let (mut shell, seen) = shell_with(true, root.clone());

    run_script(
        &mut shell,
        "prompt a cat\ngenerate\nedit\nprompt brighter\ngenerate\nquit\n",
    );

    let seen = seen.lock().expect("lock");
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1].mode, Mode::Edit);
    assert_eq!(seen[1].function, Function::Edit(EditFunction::Retouch));
    assert_eq!(
        seen[1].rendered_prompt(),
        "Enhance and retouch: brighter. Fix details, lighting and clarity."
    );
    assert_eq!(
        seen[1].image1,
        Some(ImageData::new("iVBORw0K", "image/png"))
    );
    drop(seen);

    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn cross_mode_function_is_sent_untemplated() {
    let root = temp_root("cross_mode");
    let (mut shell, seen) = shell_with(true, root.clone());

    run_script(&mut shell, "function retouch\nprompt sunset\ngenerate\nquit\n");

    {
        let seen = seen.lock().expect("lock");
        assert_eq!(seen[0].mode, Mode::Create);
        assert_eq!(seen[0].function, Function::Edit(EditFunction::Retouch));
        assert_eq!(seen[0].rendered_prompt(), "sunset");
    }

    fs::remove_dir_all(root).expect("cleanup");
}
