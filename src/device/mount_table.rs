use std::path::PathBuf;

/// Mount point prefixes desktop automounters use for removable media
const REMOVABLE_MOUNT_PREFIXES: [&str; 2] = ["/media/", "/run/media/"];

/// Pick removable media mount points out of `/proc/mounts` formatted text.
/// Pure function
pub fn parse_removable_mounts(contents: &str) -> Vec<PathBuf> {
    contents
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let device = fields.next()?;
            let mount_point = fields.next()?;
            Some((device, decode_mount_field(mount_point)))
        })
        .filter(|(device, _)| device.starts_with("/dev/"))
        .filter(|(_, mount_point)| {
            REMOVABLE_MOUNT_PREFIXES
                .iter()
                .any(|prefix| mount_point.starts_with(prefix))
        })
        .map(|(_, mount_point)| PathBuf::from(mount_point))
        .collect()
}

/// Undo the octal escaping the kernel applies to spaces, tabs, newlines and backslashes
pub fn decode_mount_field(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() && is_octal_escape(&bytes[i + 1..i + 4]) {
            let value = bytes[i + 1..i + 4]
                .iter()
                .fold(0u32, |acc, digit| acc * 8 + u32::from(digit - b'0'));
            if let Ok(byte) = u8::try_from(value) {
                decoded.push(byte);
                i += 4;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn is_octal_escape(digits: &[u8]) -> bool {
    digits.len() == 3 && digits.iter().all(|d| (b'0'..=b'7').contains(d))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
sysfs /sys sysfs rw,nosuid,nodev,noexec,relatime 0 0
/dev/nvme0n1p2 / ext4 rw,relatime 0 0
tmpfs /run/user/1000 tmpfs rw,nosuid,nodev 0 0
/dev/sdb1 /media/alex/KINGSTON vfat rw,nosuid,nodev,uid=1000 0 0
/dev/sdc1 /run/media/alex/My\\040Photos exfat rw,nosuid 0 0
/dev/sdd1 /mnt/backup ext4 rw 0 0
";

    #[test]
    fn test_parse_removable_mounts() {
        let mounts = parse_removable_mounts(SAMPLE);
        assert_eq!(
            mounts,
            vec![
                PathBuf::from("/media/alex/KINGSTON"),
                PathBuf::from("/run/media/alex/My Photos"),
            ]
        );
    }

    #[test]
    fn test_parse_ignores_malformed_lines() {
        assert!(parse_removable_mounts("\n/dev/sdb1\n").is_empty());
    }

    #[test]
    fn test_decode_mount_field() {
        assert_eq!(decode_mount_field("a\\040b\\011c"), "a b\tc");
        assert_eq!(decode_mount_field("back\\134slash"), "back\\slash");
        assert_eq!(decode_mount_field("plain"), "plain");
        assert_eq!(decode_mount_field("trailing\\04"), "trailing\\04");
    }
}
