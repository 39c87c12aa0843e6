use std::path::Path;
use std::path::PathBuf;

use crate::Action;
use crate::Variable;

pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create dir: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write: {e}"));
	path
}

pub fn action(name: &str, code: &str) -> Action {
	Action::new(name, code)
}

pub fn variable(name: &str, type_name: &str) -> Variable {
	Variable {
		name: name.to_string(),
		type_name: type_name.to_string(),
		..Variable::default()
	}
}

pub const PROJECT_APJ: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<?AutomationStudio Version=4.12.2.65?>
<Project Version="4.12.2" Description="Line controller" xmlns="http://br-automation.co.at/AS/Project" />
"#;

pub const LOGICAL_PACKAGE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Package xmlns="http://br-automation.co.at/AS/Package">
  <Objects>
    <Object Type="Program" Language="IEC" Description="Main program">Main</Object>
    <Object Type="Library" Language="IEC" Description="Motion helpers">MyLib</Object>
    <Object Type="Library" Language="IEC">IecCheck</Object>
    <Object Type="File">Global.typ</Object>
    <Object Type="File">Global.var</Object>
  </Objects>
</Package>
"#;

pub const GLOBAL_TYP: &str = "TYPE
	Recipe_typ : STRUCT (*Recipe data*)
		Speed : REAL; (*Line speed*)
		Count : INT := 3;
	END_STRUCT;
	Mode_enum :
		( (*Operating mode*)
		MODE_OFF := 0, (*Stopped*)
		MODE_AUTO
		);
END_TYPE
";

pub const GLOBAL_VAR: &str = "VAR CONSTANT
	MAX_ITEMS : USINT := 10; (*Upper bound*)
END_VAR
VAR
	gCounter : UDINT;
END_VAR
";

pub const MAIN_PRG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Program SubType="IEC" xmlns="http://br-automation.co.at/AS/Program">
  <Files>
    <File Description="Implementation code">Main.st</File>
    <File Description="Local variables" Private="true">Main.var</File>
  </Files>
</Program>
"#;

pub const MAIN_VAR: &str = "VAR_INPUT
	x : BOOL;
END_VAR
VAR
	step : INT;
END_VAR
";

pub const MAIN_ST: &str = "PROGRAM _INIT
	step := 0;
END_PROGRAM

PROGRAM _CYCLIC
	x := TRUE;
	Reset;
END_PROGRAM

ACTION Reset:
	step := 0;
	Clear;
END_ACTION

ACTION Clear:
	x := FALSE;
END_ACTION
";

pub const MYLIB_LBY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Library Version="2.1.0" SubType="IEC" xmlns="http://br-automation.co.at/AS/Library">
  <Files>
    <File>MyLib.fun</File>
    <File>MyLib.st</File>
  </Files>
  <Dependencies>
    <Dependency ObjectName="Runtime" />
    <Dependency ObjectName="AsBrStr" />
  </Dependencies>
</Library>
"#;

pub const MYLIB_FUN: &str = "FUNCTION_BLOCK Blinker (*Toggles an output*)
	VAR_INPUT
		enable : BOOL;
	END_VAR
	VAR_OUTPUT
		out : BOOL;
	END_VAR
	VAR
		ticks : UINT;
	END_VAR
END_FUNCTION_BLOCK

FUNCTION Clamp : INT (*Limits a value*)
	VAR_INPUT
		value : INT;
		low : INT;
		high : INT;
	END_VAR
END_FUNCTION
";

pub const MYLIB_ST: &str = "FUNCTION_BLOCK Blinker
	ticks := ticks + 1;
	Toggle;
END_FUNCTION_BLOCK

FUNCTION Clamp
	Clamp := MIN(MAX(value, low), high);
END_FUNCTION

ACTION Toggle:
	out := NOT out;
END_ACTION
";

/// A declaration without any implementation. Reading it fails, so it only
/// appears below namespaces that must be skipped.
pub const UNIMPLEMENTED_FUN: &str = "FUNCTION Missing : BOOL
	VAR_INPUT
		a : BOOL;
	END_VAR
END_FUNCTION
";

pub const BINARY_LBY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Library Version="1.0.0" SubType="Binary" xmlns="http://br-automation.co.at/AS/Library" />
"#;

/// Build a vendor project with a program, a library, the default-ignored
/// `IecCheck` library, and a binary library. Returns the `.apj` path.
pub fn vendor_project(root: &Path) -> PathBuf {
	let apj = write_file(root, "Project.apj", PROJECT_APJ);
	write_file(root, "Logical/Package.pkg", LOGICAL_PACKAGE);
	write_file(root, "Logical/Global.typ", GLOBAL_TYP);
	write_file(root, "Logical/Global.var", GLOBAL_VAR);
	write_file(root, "Logical/Main/Main.prg", MAIN_PRG);
	write_file(root, "Logical/Main/Main.var", MAIN_VAR);
	write_file(root, "Logical/Main/Main.st", MAIN_ST);
	write_file(root, "Logical/MyLib/MyLib.lby", MYLIB_LBY);
	write_file(root, "Logical/MyLib/MyLib.fun", MYLIB_FUN);
	write_file(root, "Logical/MyLib/MyLib.st", MYLIB_ST);
	write_file(root, "Logical/IecCheck/IecCheck.lby", MYLIB_LBY);
	write_file(root, "Logical/IecCheck/IecCheck.fun", UNIMPLEMENTED_FUN);
	write_file(root, "Logical/Libraries/AsBrStr/binary.lby", BINARY_LBY);
	write_file(root, "Logical/Libraries/AsBrStr/AsBrStr.fun", UNIMPLEMENTED_FUN);
	apj
}

/// The smallest project with one program: one `.var` file and one source.
pub fn minimal_vendor_project(root: &Path) -> PathBuf {
	let apj = write_file(root, "Minimal.apj", PROJECT_APJ);
	write_file(root, "Logical/Prog/Prog.prg", MAIN_PRG);
	write_file(root, "Logical/Prog/Prog.var", "VAR_INPUT x : BOOL; END_VAR");
	write_file(
		root,
		"Logical/Prog/Prog.st",
		"PROGRAM _CYCLIC x := TRUE; END_PROGRAM",
	);
	apj
}

/// An empty global region and one populated configuration named `PLC1`.
pub const TC6_PLC1: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<project xmlns="http://www.plcopen.org/xml/tc6_0200">
  <fileHeader companyName="Acme" companyURL="https://acme.example" productName="CODESYS" productVersion="3.5" creationDateTime="2024-01-02T03:04:05" />
  <contentHeader name="Conveyor" version="1.2" modificationDateTime="2024-02-03T04:05:06" author="Jane">
    <Comment>Conveyor
line  control</Comment>
    <coordinateInfo>
      <fbd><scaling x="1" y="1" /></fbd>
    </coordinateInfo>
  </contentHeader>
  <types>
    <dataTypes />
    <pous />
  </types>
  <instances>
    <configurations>
      <configuration name="PLC1">
        <resource name="Application">
          <addData>
            <data name="http://www.3s-software.com/plcopenxml/datatype" handleUnknown="implementation">
              <dataType name="MotorState">
                <baseType>
                  <enum>
                    <values>
                      <value name="Idle" value="0" />
                      <value name="Running" value="1" />
                    </values>
                  </enum>
                </baseType>
                <initialValue>
                  <simpleValue value="Idle" />
                </initialValue>
              </dataType>
            </data>
            <data name="http://www.3s-software.com/plcopenxml/datatype" handleUnknown="implementation">
              <dataType name="Config">
                <baseType>
                  <struct>
                    <variable name="ramp">
                      <type><TIME /></type>
                      <initialValue><simpleValue value="T#2s" /></initialValue>
                    </variable>
                    <variable name="limit">
                      <type><REAL /></type>
                    </variable>
                  </struct>
                </baseType>
                <documentation>
                  <xhtml xmlns="http://www.w3.org/1999/xhtml">Motor settings</xhtml>
                </documentation>
              </dataType>
            </data>
            <data name="http://www.3s-software.com/plcopenxml/datatype" handleUnknown="implementation">
              <dataType name="Percent">
                <baseType>
                  <subrangeSigned>
                    <range lower="0" upper="100" />
                    <baseType><INT /></baseType>
                  </subrangeSigned>
                </baseType>
              </dataType>
            </data>
            <data name="http://www.3s-software.com/plcopenxml/pou" handleUnknown="implementation">
              <pou name="Motor" pouType="functionBlock">
                <interface>
                  <inputVars>
                    <variable name="enable">
                      <type><BOOL /></type>
                      <initialValue><simpleValue value="FALSE" /></initialValue>
                      <documentation>
                        <xhtml xmlns="http://www.w3.org/1999/xhtml">Run request</xhtml>
                      </documentation>
                    </variable>
                  </inputVars>
                  <outputVars retain="true">
                    <variable name="speeds">
                      <type>
                        <array>
                          <dimension lower="0" upper="2" />
                          <baseType><REAL /></baseType>
                        </array>
                      </type>
                      <initialValue>
                        <arrayValue>
                          <value><simpleValue value="1.0" /></value>
                          <value repetitionValue="2"><simpleValue value="0.0" /></value>
                        </arrayValue>
                      </initialValue>
                    </variable>
                  </outputVars>
                  <localVars>
                    <variable name="state">
                      <type><derived name="MotorState" /></type>
                    </variable>
                    <variable name="label">
                      <type><string length="20" /></type>
                    </variable>
                    <variable name="target">
                      <type><pointer><baseType><INT /></baseType></pointer></type>
                    </variable>
                    <variable name="config">
                      <type><derived name="Config" /></type>
                      <initialValue>
                        <structValue>
                          <value member="limit"><simpleValue value="1.5" /></value>
                        </structValue>
                      </initialValue>
                    </variable>
                  </localVars>
                  <documentation>
                    <xhtml xmlns="http://www.w3.org/1999/xhtml">Drives a motor</xhtml>
                  </documentation>
                </interface>
                <body>
                  <ST><xhtml xmlns="http://www.w3.org/1999/xhtml">IF enable THEN Start; END_IF;</xhtml></ST>
                </body>
                <actions>
                  <action name="Start">
                    <body>
                      <ST><xhtml xmlns="http://www.w3.org/1999/xhtml">state := MotorState.Running;</xhtml></ST>
                    </body>
                  </action>
                </actions>
                <addData>
                  <data name="http://www.3s-software.com/plcopenxml/method" handleUnknown="implementation">
                    <Method name="Reset" ObjectId="4f0c2a2e">
                      <interface>
                        <returnType><BOOL /></returnType>
                        <inputVars>
                          <variable name="hard">
                            <type><BOOL /></type>
                          </variable>
                        </inputVars>
                        <documentation>
                          <xhtml xmlns="http://www.w3.org/1999/xhtml">Clears faults</xhtml>
                        </documentation>
                      </interface>
                      <body>
                        <ST><xhtml xmlns="http://www.w3.org/1999/xhtml">Reset := TRUE;</xhtml></ST>
                      </body>
                    </Method>
                  </data>
                </addData>
              </pou>
            </data>
            <data name="http://www.3s-software.com/plcopenxml/pou" handleUnknown="implementation">
              <pou name="Scale" pouType="function">
                <interface>
                  <returnType><REAL /></returnType>
                  <inputVars>
                    <variable name="raw">
                      <type><INT /></type>
                      <addData>
                        <data name="http://www.3s-software.com/plcopenxml/attributes" handleUnknown="implementation">
                          <Attributes>
                            <Attribute Name="input_constant" Value="" />
                          </Attributes>
                        </data>
                      </addData>
                    </variable>
                  </inputVars>
                </interface>
                <body>
                  <ST><xhtml xmlns="http://www.w3.org/1999/xhtml">Scale := INT_TO_REAL(raw) * 0.1;</xhtml></ST>
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

/// TC6 v2.01 document with global units and no extension region.
pub const TC6_GLOBAL: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<project xmlns="http://www.plcopen.org/xml/tc6_0201" xmlns:xhtml="http://www.w3.org/1999/xhtml">
  <fileHeader companyName="Acme" creationDateTime="2024-01-02T03:04:05" contentDescription="Packaging cell" />
  <contentHeader name="Cell" version="3" organization="Acme Automation" />
  <types>
    <dataTypes>
      <dataType name="Matrix">
        <baseType>
          <struct>
            <variable name="cells">
              <type>
                <array>
                  <dimension lower="0" upper="9" />
                  <dimension lower="1" upper="3" />
                  <baseType><LREAL /></baseType>
                </array>
              </type>
            </variable>
            <variable name="name">
              <type><wstring /></type>
            </variable>
          </struct>
        </baseType>
      </dataType>
    </dataTypes>
    <pous>
      <pou name="Cell" pouType="program">
        <interface>
          <localVars constant="true">
            <variable name="LIMIT">
              <type><INT /></type>
              <initialValue><simpleValue value="5" /></initialValue>
            </variable>
          </localVars>
        </interface>
        <body>
          <IL><xhtml:p>LD LIMIT</xhtml:p></IL>
        </body>
      </pou>
      <pou name="Legacy" pouType="sfcStep" />
    </pous>
  </types>
</project>
"#;

pub const TC6_WITHOUT_TYPES: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<project xmlns="http://www.plcopen.org/xml/tc6_0201">
  <fileHeader companyName="Acme" />
  <contentHeader name="Empty" />
</project>
"#;

pub const IEC10_PROJECT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project xmlns="www.iec.ch/public/TC65SC65BWG7TF10" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" schemaVersion="1.0">
  <FileHeader companyName="Acme" companyURL="https://acme.example" contentDescription="Demo&#10;project" />
  <ContentHeader name="Demo" version="0.1" author="Sam" modificationDateTime="2024-05-06T07:08:09" />
  <Types>
    <GlobalNamespace>
      <DataTypeDecl name="Color">
        <UserDefinedTypeSpec xsi:type="EnumTypeWithNamedValueSpec">
          <Enumerator name="Red" value="1" />
          <Enumerator name="Green" value="2" />
        </UserDefinedTypeSpec>
      </DataTypeDecl>
      <Program name="MainPrg">
        <Vars>
          <Variable name="counter">
            <Type><TypeName>INT</TypeName></Type>
            <InitialValue><SimpleValue value="5" /></InitialValue>
            <Documentation>Cycle counter</Documentation>
          </Variable>
        </Vars>
        <TempVars />
        <MainBody>
          <BodyContent xsi:type="ST"><ST>counter := counter + 1;</ST></BodyContent>
        </MainBody>
        <Action name="Reset">
          <Body>
            <BodyContent xsi:type="ST"><ST>counter := 0;</ST></BodyContent>
          </Body>
        </Action>
      </Program>
      <NamespaceDecl name="Motion">
        <FunctionBlock name="Axis">
          <Parameters>
            <InputVars>
              <Variable name="enable">
                <Type><TypeName>BOOL</TypeName></Type>
              </Variable>
            </InputVars>
          </Parameters>
          <MainBody>
            <BodyContent xsi:type="FBD"><FBD /></BodyContent>
          </MainBody>
          <Method name="Home">
            <ResultType><TypeName>BOOL</TypeName></ResultType>
            <Body>
              <BodyContent xsi:type="ST"><ST>Home := TRUE;</ST></BodyContent>
            </Body>
          </Method>
        </FunctionBlock>
        <NamespaceDecl name="Drives">
          <Function name="Limit">
            <ResultType><TypeName>REAL</TypeName></ResultType>
            <Parameters>
              <InputVars>
                <Variable name="x">
                  <Type><TypeName>REAL</TypeName></Type>
                </Variable>
              </InputVars>
            </Parameters>
            <MainBody>
              <BodyContent xsi:type="ST"><ST>Limit := x;</ST></BodyContent>
            </MainBody>
          </Function>
        </NamespaceDecl>
      </NamespaceDecl>
      <NamespaceDecl name="Empty" />
    </GlobalNamespace>
  </Types>
</Project>
"#;
