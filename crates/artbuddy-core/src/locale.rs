//! User-facing copy.
//!
//! Every string a client shows (labels, warnings, the greeting, the model
//! instructions) lives in one [`UiStrings`] table per [`Locale`], so the
//! session logic never formats text of its own.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::session::InputMode;

/// Language of the user-facing copy.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    /// Korean, the language of the classroom this was built for.
    #[default]
    Ko,
    /// English.
    En,
}

impl Locale {
    /// Returns the copy table for this locale.
    pub fn strings(self) -> &'static UiStrings {
        match self {
            Locale::Ko => &KO,
            Locale::En => &EN,
        }
    }
}

/// Fixed copy for one locale.
#[derive(Debug)]
pub struct UiStrings {
    pub title: &'static str,
    pub greeting: &'static str,
    /// Toggle button text while in file mode (names the camera mode).
    pub switch_to_camera: &'static str,
    /// Toggle button text while in camera mode (names the file mode).
    pub switch_to_file: &'static str,
    pub current_mode_prefix: &'static str,
    pub camera_mode_name: &'static str,
    pub file_mode_name: &'static str,
    pub camera_widget_label: &'static str,
    pub file_widget_label: &'static str,
    pub camera_hint: &'static str,
    pub submit_label: &'static str,
    pub working: &'static str,
    pub image_caption: &'static str,
    pub missing_camera_input: &'static str,
    pub missing_file_input: &'static str,
    pub unsupported_image: &'static str,
    pub empty_image: &'static str,
    pub image_too_large: &'static str,
    pub busy: &'static str,
    pub failure_prefix: &'static str,
    pub failure_detail_label: &'static str,
    pub system_instruction: &'static str,
    pub critique_prompt: &'static str,
}

impl UiStrings {
    /// Label of the mode toggle; names the mode the button switches *to*.
    pub fn toggle_label(&self, current: InputMode) -> &'static str {
        match current {
            InputMode::File => self.switch_to_camera,
            InputMode::Camera => self.switch_to_file,
        }
    }

    /// Human name of a mode, e.g. "파일 업로드".
    pub fn mode_name(&self, mode: InputMode) -> &'static str {
        match mode {
            InputMode::Camera => self.camera_mode_name,
            InputMode::File => self.file_mode_name,
        }
    }

    /// "💡 현재 모드: 파일 업로드"
    pub fn current_mode_line(&self, mode: InputMode) -> String {
        format!("{}{}", self.current_mode_prefix, self.mode_name(mode))
    }

    pub fn widget_label(&self, mode: InputMode) -> &'static str {
        match mode {
            InputMode::Camera => self.camera_widget_label,
            InputMode::File => self.file_widget_label,
        }
    }

    /// Warning for a submit with nothing captured in `mode`.
    pub fn missing_input(&self, mode: InputMode) -> &'static str {
        match mode {
            InputMode::Camera => self.missing_camera_input,
            InputMode::File => self.missing_file_input,
        }
    }

    /// Assistant message appended when the model call fails.
    pub fn failure_message(&self, detail: &str) -> String {
        format!(
            "{} ({}: {})",
            self.failure_prefix, self.failure_detail_label, detail
        )
    }
}

static KO: UiStrings = UiStrings {
    title: "곡수초 O학년 그림 이야기 챗봇~",
    greeting: "안녕! 그림이나 사진을 올리거나 카메라로 찍어서 아래 버튼을 누르면 선생님이 멋진 점과 더 재미있게 그릴 아이디어를 이야기해줄게!",
    switch_to_camera: "📸 카메라로 찍기",
    switch_to_file: "📁 파일로 올리기",
    current_mode_prefix: "💡 현재 모드: ",
    camera_mode_name: "카메라 촬영",
    file_mode_name: "파일 업로드",
    camera_widget_label: "카메라로 그림/사진 찍기",
    file_widget_label: "컴퓨터에서 그림/사진 올리기",
    camera_hint: "카메라가 켜지면 보이는 화면에서 [Take Photo] 버튼을 눌러 사진을 찍고, [Clear photo] 버튼은 찍은 사진을 다시 지울 때 사용해요.",
    submit_label: "선생님께 그림/사진 보여주기!",
    working: "친구 그림/사진을 살펴보고 있어요...",
    image_caption: "친구 그림/사진",
    missing_camera_input: "카메라로 사진을 찍은 후 버튼을 눌러야 해요!",
    missing_file_input: "그림/사진 파일을 올린 후 버튼을 눌러야 해요!",
    unsupported_image: "PNG, JPG, GIF 그림 파일만 올릴 수 있어요!",
    empty_image: "그림/사진이 비어 있어요. 다시 올려줄래?",
    image_too_large: "그림/사진이 너무 커요. 조금 더 작은 파일로 올려줄래?",
    busy: "선생님이 아직 그림을 보고 있어요. 조금만 기다려줘!",
    failure_prefix: "앗, 그림/사진을 살펴보다가 문제가 생겼어요. 다시 시도해주거나 다른 그림/사진을 올려줄래?",
    failure_detail_label: "오류",
    system_instruction: KO_SYSTEM_INSTRUCTION,
    critique_prompt: "이 그림/사진을 보고 초등학생 친구에게 이야기하듯이 설명해줘. 먼저 그림의 멋진 점을 충분히 칭찬해주고, 만약 필요하다면 더 멋져질 수 있는 부분을 부드럽게 조언해줘. 네가 초등학생 친구에게 말하듯이 친절하고 상냥하게 이야기해야 해.",
};

const KO_SYSTEM_INSTRUCTION: &str = "\
당신은 초등학생 친구들을 위한 친절한 그림 선생님 도우미예요!
친구들이 올린 그림이나 사진을 보고, 재미있거나 멋진 점을 이야기해주세요.

**먼저, 그림의 좋은 점을 충분히 칭찬해주세요.** 색깔을 예쁘게 썼다거나, 재미있는 상상을 했다거나, 열심히 그린 부분 등 칭찬할 점을 구체적으로 찾아 이야기해주세요.

**친구의 그림/사진을 잘 살펴봐 주세요.** 그림을 더 풍성하고 재미있게 만들 수 있는 아이디어가 떠오른다면 (예: 비어 있는 배경, 부족한 색칠, 이야기 추가 등), **그때** 아주 부드럽고 조심스럽게 개선 아이디어를 이야기해주세요.

**하지만 만약 그림이 이미 멋지게 완성되어 있거나, 추가 조언이 어울리지 않는 경우라면, 개선 아이디어는 생략하고 칭찬으로만 마무리해도 괜찮습니다.**

**절대 '틀렸다', '이상하다', '나쁘다' 같은 부정적인 말은 사용하지 않아요.** 항상 '이렇게 해보면 더 멋져질 거야!' 와 같이 긍정적으로 이야기해주세요.

어려운 단어는 쓰지 말고, 초등학생 친구들이 기분 좋게 이해하고 다음에 그림 그릴 때 도움이 될 수 있도록 상냥하고 따뜻하게 말해주세요.
";

static EN: UiStrings = UiStrings {
    title: "Picture Story Chatbot",
    greeting: "Hi! Upload a picture or take one with the camera, press the button below, and I'll tell you what's great about it and share a fun idea or two!",
    switch_to_camera: "📸 Take a photo",
    switch_to_file: "📁 Upload a file",
    current_mode_prefix: "💡 Current mode: ",
    camera_mode_name: "camera",
    file_mode_name: "file upload",
    camera_widget_label: "Take a photo of your picture",
    file_widget_label: "Upload a picture from your computer",
    camera_hint: "When the camera turns on, press [Take Photo] to snap a picture. Press [Clear photo] to take it again.",
    submit_label: "Show my picture to the teacher!",
    working: "Looking at your picture...",
    image_caption: "Your picture",
    missing_camera_input: "Take a photo with the camera first, then press the button!",
    missing_file_input: "Upload a picture file first, then press the button!",
    unsupported_image: "Only PNG, JPG and GIF pictures can be uploaded!",
    empty_image: "That picture is empty. Could you try again?",
    image_too_large: "That picture is too big. Could you try a smaller file?",
    busy: "The teacher is still looking at your picture. Please wait a moment!",
    failure_prefix: "Oops, something went wrong while looking at your picture. Could you try again or share a different one?",
    failure_detail_label: "error",
    system_instruction: EN_SYSTEM_INSTRUCTION,
    critique_prompt: "Look at this picture and talk about it the way you would to a grade-school friend. First give plenty of praise for what is great about it, and only if it helps, gently suggest something that could make it even better. Be kind and warm, like talking to a young friend.",
};

const EN_SYSTEM_INSTRUCTION: &str = "\
You are a kind art-teacher helper for grade-school kids!
Look at the drawing or photo a friend shared and talk about what is fun or great about it.

**First, give plenty of praise for what is good.** Find specific things to praise, such as lovely colors, a fun imagination, or parts that were drawn with care.

**Look closely at the picture.** If an idea comes to mind that would make it richer or more fun (for example an empty background, more coloring, or adding a story), **only then** share it very gently.

**If the picture already looks finished, or no extra idea fits, skip the suggestion and finish with praise only.**

**Never use negative words like 'wrong', 'weird' or 'bad'.** Always say things positively, such as 'If you try this, it will look even more amazing!'

Avoid difficult words. Speak kindly and warmly so kids feel good and find it helpful next time they draw.
";

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn toggle_label_names_next_mode() {
        let ko = Locale::Ko.strings();
        assert_eq!(ko.toggle_label(InputMode::File), "📸 카메라로 찍기");
        assert_eq!(ko.toggle_label(InputMode::Camera), "📁 파일로 올리기");
    }

    #[test]
    fn missing_file_warning_mentions_file() {
        assert!(Locale::Ko.strings().missing_input(InputMode::File).contains("파일"));
        assert!(Locale::En.strings().missing_input(InputMode::File).contains("file"));
    }

    #[test]
    fn failure_message_embeds_detail() {
        let text = Locale::Ko.strings().failure_message("ProviderTimeout");
        assert!(text.starts_with("앗,"));
        assert!(text.ends_with("(오류: ProviderTimeout)"));
    }

    #[test]
    fn locale_parses_from_config_text() {
        assert_eq!(Locale::from_str("en").unwrap(), Locale::En);
        assert_eq!(Locale::default(), Locale::Ko);
        assert_eq!(Locale::Ko.to_string(), "ko");
    }
}
