//! Channel MODE: queries, list edits, flag toggles and member privileges.

use super::{Channel, MaskList};
use crate::config::Config;
use crate::error::ChannelError;
use crate::state::user::User;
use tinyirc_proto::{ChannelMode, Message, ModeChange, Response, format_mode_changes, parse_channel_modes};

impl Channel {
    /// Apply a MODE request from `user`.
    ///
    /// Operations are grouped per mode letter in first-occurrence order. A
    /// list mode (`b`, `e`, `I`) whose group carries no parameter at all is a
    /// query and is answered directly; every other group is a change and
    /// requires channel operator status. Only changes that took effect are
    /// echoed, as one MODE line to the whole channel.
    pub fn apply_modes(
        &mut self,
        user: &User,
        params: &[String],
        config: &Config,
    ) -> Result<(), ChannelError> {
        let groups = group_by_mode(parse_channel_modes(params));

        let changes_anything = groups
            .iter()
            .any(|(mode, ops)| !is_list_query(*mode, ops));
        if changes_anything && !self.is_op(&user.nick()) {
            return Err(ChannelError::ChanOpPrivsNeeded);
        }

        let set_by = user.address();
        let mut applied = Vec::new();

        for (mode, ops) in groups {
            match mode {
                ChannelMode::Ban | ChannelMode::Exception | ChannelMode::InviteMask => {
                    if is_list_query(mode, &ops) {
                        self.send_list(user, mode, &config.server.name);
                        continue;
                    }
                    let list = self.list_mut(mode);
                    for op in ops {
                        let Some(mask) = op.arg else { continue };
                        if let Some(mask) = list.apply(&mask, op.adding, &set_by) {
                            applied.push(ModeChange::new(op.adding, mode, Some(mask)));
                        }
                    }
                }
                ChannelMode::InviteOnly | ChannelMode::Moderated | ChannelMode::Secret => {
                    for op in ops {
                        if self.set_flag(mode, op.adding) {
                            applied.push(ModeChange::new(op.adding, mode, None));
                        }
                    }
                }
                ChannelMode::Key => {
                    for op in ops {
                        if op.adding {
                            let key = op
                                .arg
                                .as_deref()
                                .and_then(|arg| arg.split_whitespace().next());
                            let Some(key) = key else { continue };
                            if self.key.as_deref() != Some(key) {
                                self.key = Some(key.to_string());
                                applied.push(ModeChange::new(true, mode, Some(key.to_string())));
                            }
                        } else if let Some(old) = self.key.take() {
                            applied.push(ModeChange::new(false, mode, Some(old)));
                        }
                    }
                }
                ChannelMode::Limit => {
                    let hard = config.limits.max_channel_members;
                    for op in ops {
                        if op.adding {
                            let Some(limit) = op.arg.as_deref().and_then(|a| a.parse::<usize>().ok())
                            else {
                                continue;
                            };
                            let limit = limit.min(hard);
                            if self.limit != Some(limit) {
                                self.limit = Some(limit);
                                applied.push(ModeChange::new(true, mode, Some(limit.to_string())));
                            }
                        } else if self.limit.take().is_some() {
                            applied.push(ModeChange::new(false, mode, None));
                        }
                    }
                }
                ChannelMode::Oper | ChannelMode::Voice => {
                    for op in ops {
                        let Some(target) = op.arg else { continue };
                        let Some(member) = self.members.get_mut(&target) else {
                            continue;
                        };
                        let flag = if mode == ChannelMode::Oper {
                            &mut member.op
                        } else {
                            &mut member.voice
                        };
                        if *flag == op.adding {
                            continue;
                        }
                        *flag = op.adding;
                        let display = member.user().map_or(target, |u| u.nick());
                        applied.push(ModeChange::new(op.adding, mode, Some(display)));
                    }
                }
            }
        }

        if !applied.is_empty() {
            let (modes, args) = format_mode_changes(&applied);
            let mut params = vec![self.name.clone(), modes];
            params.extend(args);
            let msg = Message::new("MODE", params).with_prefix(user.prefix());
            self.broadcast(&msg, None);
        }
        Ok(())
    }

    /// Reply 324 with the current flags, then key and limit as parameters.
    /// The key is only shown to members.
    pub fn send_modes(&self, user: &User, server: &str) {
        let nick = user.nick();
        let mut modes = String::from("+");
        let mut args = Vec::new();

        if self.flags.moderated {
            modes.push('m');
        }
        if self.flags.invite_only {
            modes.push('i');
        }
        if self.flags.secret {
            modes.push('s');
        }
        if let Some(key) = &self.key {
            modes.push('k');
            if self.is_member(&nick) {
                args.push(key.clone());
            }
        }
        if let Some(limit) = self.limit {
            modes.push('l');
            args.push(limit.to_string());
        }

        let mut params = vec![nick, self.name.clone(), modes];
        params.extend(args);
        user.send(Message::response(server, Response::RPL_CHANNELMODEIS, params));
    }

    /// List entries followed by the end-of-list reply.
    fn send_list(&self, user: &User, mode: ChannelMode, server: &str) {
        let (list, item, end, what) = match mode {
            ChannelMode::Exception => (
                &self.excepts,
                Response::RPL_EXCEPTLIST,
                Response::RPL_ENDOFEXCEPTLIST,
                "End of channel exception list",
            ),
            ChannelMode::InviteMask => (
                &self.invites,
                Response::RPL_INVITELIST,
                Response::RPL_ENDOFINVITELIST,
                "End of channel invite list",
            ),
            _ => (
                &self.bans,
                Response::RPL_BANLIST,
                Response::RPL_ENDOFBANLIST,
                "End of channel ban list",
            ),
        };

        let nick = user.nick();
        for entry in list.entries() {
            user.send(Message::response(
                server,
                item,
                vec![
                    nick.clone(),
                    self.name.clone(),
                    entry.mask.clone(),
                    entry.set_by.clone(),
                    entry.set_at.to_string(),
                ],
            ));
        }
        user.send(Message::response(
            server,
            end,
            vec![nick, self.name.clone(), what.to_string()],
        ));
    }

    fn list_mut(&mut self, mode: ChannelMode) -> &mut MaskList {
        match mode {
            ChannelMode::Exception => &mut self.excepts,
            ChannelMode::InviteMask => &mut self.invites,
            _ => &mut self.bans,
        }
    }

    /// Returns whether the flag changed.
    fn set_flag(&mut self, mode: ChannelMode, on: bool) -> bool {
        let flag = match mode {
            ChannelMode::InviteOnly => &mut self.flags.invite_only,
            ChannelMode::Moderated => &mut self.flags.moderated,
            ChannelMode::Secret => &mut self.flags.secret,
            _ => return false,
        };
        let changed = *flag != on;
        *flag = on;
        changed
    }
}

fn is_list_query(mode: ChannelMode, ops: &[ModeChange]) -> bool {
    mode.is_list_mode() && ops.iter().all(|op| op.arg.is_none())
}

/// Bucket changes by mode letter, keeping the order letters first appear.
fn group_by_mode(changes: Vec<ModeChange>) -> Vec<(ChannelMode, Vec<ModeChange>)> {
    let mut groups: Vec<(ChannelMode, Vec<ModeChange>)> = Vec::new();
    for change in changes {
        match groups.iter_mut().find(|(mode, _)| *mode == change.mode) {
            Some((_, ops)) => ops.push(change),
            None => groups.push((change.mode, vec![change])),
        }
    }
    groups
}
