#![allow(dead_code)]

use std::path::Path;
use std::path::PathBuf;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn plcnorm_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("plcnorm"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("PLCNORM_LOG");
	cmd
}

/// A TC6 v2.01 export with one configuration holding a function block whose
/// local `settings` has a structured initial value.
pub const TC6_PROJECT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<project xmlns="http://www.plcopen.org/xml/tc6_0201">
  <fileHeader companyName="Acme" creationDateTime="2024-01-02T03:04:05" />
  <contentHeader name="Line" version="2.0" modificationDateTime="2024-02-03T04:05:06" />
  <types>
    <dataTypes>
      <dataType name="Mode">
        <baseType>
          <enum>
            <values>
              <value name="Manual" value="0" />
              <value name="Auto" value="1" />
            </values>
          </enum>
        </baseType>
      </dataType>
    </dataTypes>
    <pous />
  </types>
  <instances>
    <configurations>
      <configuration name="PLC1">
        <resource name="Application">
          <addData>
            <data name="http://www.3s-software.com/plcopenxml/pou" handleUnknown="implementation">
              <pou name="Pump" pouType="functionBlock">
                <interface>
                  <inputVars>
                    <variable name="run">
                      <type><BOOL /></type>
                    </variable>
                  </inputVars>
                  <localVars>
                    <variable name="settings">
                      <type><derived name="Settings" /></type>
                      <initialValue>
                        <structValue>
                          <value member="limit"><simpleValue value="10" /></value>
                        </structValue>
                      </initialValue>
                    </variable>
                  </localVars>
                </interface>
                <body>
                  <ST><xhtml xmlns="http://www.w3.org/1999/xhtml">Start();</xhtml></ST>
                </body>
                <actions>
                  <action name="Start">
                    <body>
                      <ST><xhtml xmlns="http://www.w3.org/1999/xhtml">run := TRUE;</xhtml></ST>
                    </body>
                  </action>
                </actions>
              </pou>
            </data>
          </addData>
        </resource>
      </configuration>
      <configuration name="Spare">
        <resource name="Application">
          <addData>
            <data name="http://www.3s-software.com/plcopenxml/pou" handleUnknown="implementation">
              <pou name="Idle" pouType="program">
                <body>
                  <ST><xhtml xmlns="http://www.w3.org/1999/xhtml">;</xhtml></ST>
                </body>
              </pou>
            </data>
          </addData>
        </resource>
      </configuration>
    </configurations>
  </instances>
</project>
"#;

/// Write [`TC6_PROJECT`] into `dir` and return its path.
pub fn write_tc6_project(dir: &Path) -> std::io::Result<PathBuf> {
	let path = dir.join("line.xml");
	std::fs::write(&path, TC6_PROJECT)?;
	Ok(path)
}
