use shared::domain::{Video, XmppCredentials};

/// DOM selector the chat widget is mounted into.
pub const CHAT_CONTAINER: &str = "#converse-container";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMount {
    pub container: &'static str,
    pub xmpp: XmppCredentials,
}

/// Chat is only mounted for videos the backend attached XMPP credentials to.
pub fn chat_mount(video: &Video) -> Option<ChatMount> {
    video.xmpp.as_ref().map(|xmpp| ChatMount {
        container: CHAT_CONTAINER,
        xmpp: xmpp.clone(),
    })
}
