use lattice_core::{CandidatePayload, MemberId, RoomId, SessionDescription};

/// Команды, поступающие в релей от WebSocket-подключений.
#[derive(Debug)]
pub enum RelayCommand {
    /// Новое подключение зарегистрировано, member_id уже выдан.
    Connect { member_id: MemberId },

    /// Запрос на вход в комнату.
    Join { member_id: MemberId, room: RoomId },

    /// Явный выход из комнаты (соединение остаётся открытым).
    Leave { member_id: MemberId },

    /// Сигнал о разрыве WebSocket соединения.
    Disconnect { member_id: MemberId },

    /// SDP для конкретного участника; peer_id — адресат.
    Description {
        member_id: MemberId,
        peer_id: MemberId,
        description: SessionDescription,
    },

    /// ICE-кандидат для конкретного участника; peer_id — адресат.
    Candidate {
        member_id: MemberId,
        peer_id: MemberId,
        candidate: CandidatePayload,
    },
}
