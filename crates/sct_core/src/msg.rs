use crate::Message;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Message delivered by the tester master.
    Server(Message),
    /// User clicked Clear on the console view.
    ClearConsoleClicked,
}

impl From<Message> for Msg {
    fn from(message: Message) -> Self {
        Msg::Server(message)
    }
}
